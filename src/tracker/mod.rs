// Unused-class tracking
//
// The core two-pass protocol around the shrinker engine:
//
// 1. Enumeration pass (`keep_rules`): shrinking disabled, dependencies as
//    libraries. Every class the engine emits becomes a keep rule, yielding
//    the authoritative universe of first-party symbols as the engine itself
//    materializes them (nested and synthetic types included) rather than
//    trusting file-system enumeration.
// 2. Shrink pass (`find_unused`): seeded with those keep rules, dependencies
//    as additional program inputs. The removed set is parsed from the usage
//    log, then reconciled against what was actually emitted — emission
//    always wins over a removal claim.

mod usage;

pub use usage::UsageLogParser;

use crate::discovery::{ClassFileCollector, ProgramInput};
use crate::engine::{EngineJob, ShrinkEngine};
use crate::names::{external_name, OutputLayout};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Tracks which classes a shrinker would eliminate, without shrinking the
/// real output artifact.
pub struct UnusedTracker<E> {
    /// First-party class output directories, expanded recursively.
    class_dirs: Vec<PathBuf>,
    /// Exported/API archives, part of the program in both passes and never
    /// eligible for stripping.
    api_archives: Vec<PathBuf>,
    /// The collection of archives eligible for minimization, fixed at
    /// construction.
    to_minimize: HashSet<PathBuf>,
    /// Dependencies registered so far. Insertion-ordered and deduplicated so
    /// engine invocations are reproducible; grows monotonically.
    dependencies: Vec<PathBuf>,
    /// Base (JDK) libraries supplied by the hosting environment.
    base_libraries: Vec<PathBuf>,
    layout: OutputLayout,
    collector: ClassFileCollector,
    engine: E,
}

impl<E: ShrinkEngine> UnusedTracker<E> {
    /// Create a tracker writing processed classes under `temp_root`.
    ///
    /// The output directory is created eagerly; failure to create it is
    /// fatal here rather than at the first class write.
    pub fn new(
        engine: E,
        class_dirs: Vec<PathBuf>,
        api_archives: Vec<PathBuf>,
        to_minimize: Vec<PathBuf>,
        base_libraries: Vec<PathBuf>,
        temp_root: PathBuf,
    ) -> Result<Self> {
        fs::create_dir_all(&temp_root)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!("Failed to create output directory: {}", temp_root.display())
            })?;

        Ok(Self {
            class_dirs,
            api_archives,
            to_minimize: to_minimize.into_iter().collect(),
            dependencies: Vec::new(),
            base_libraries,
            layout: OutputLayout::new(temp_root),
            collector: ClassFileCollector::new(),
            engine,
        })
    }

    /// Register a dependency the packaging pipeline intends to merge.
    ///
    /// Only members of the to-minimize collection are accepted; anything
    /// else (API/exported dependencies) is a no-op. This is the sole
    /// externally driven mutation after construction.
    pub fn add_dependency(&mut self, candidate: &Path) {
        if !self.to_minimize.contains(candidate) {
            trace!("Not a minimized dependency: {}", candidate.display());
            return;
        }
        if !self.dependencies.iter().any(|d| d == candidate) {
            debug!("Tracking dependency: {}", candidate.display());
            self.dependencies.push(candidate.to_path_buf());
        }
    }

    /// Dependencies accepted so far, in registration order.
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// Path where the processed bytes of `external` are written during
    /// `find_unused`.
    pub fn class_file(&self, external: &str) -> PathBuf {
        self.layout.class_file(external)
    }

    fn first_party_inputs(&self) -> Result<Vec<ProgramInput>> {
        self.collector
            .collect_program_inputs(&self.class_dirs, &self.api_archives)
    }

    /// Run the shrink-disabled enumeration pass and synthesize one keep rule
    /// per class the engine emits.
    ///
    /// The rule list is generated fresh on every call, never cached.
    pub fn keep_rules(&self) -> Result<Vec<String>> {
        let program = self.first_party_inputs()?;

        let mut libraries = self.dependencies.clone();
        libraries.extend(self.base_libraries.iter().cloned());

        let rules: Vec<String> = [
            "-dontshrink",
            "-dontoptimize",
            "-dontobfuscate",
            "-ignorewarnings",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let mut keep = Vec::new();
        let mut class_sink = |internal: &str, _bytes: &[u8]| {
            keep.push(format!("-keep class {} {{ *; }}", external_name(internal)));
            Ok(())
        };
        let mut usage_sink = |_token: &str| {};

        info!("Enumerating program classes ({} inputs)", program.len());
        self.engine
            .run(EngineJob {
                program: &program,
                libraries: &libraries,
                rules: &rules,
                class_sink: &mut class_sink,
                usage_sink: &mut usage_sink,
            })
            .into_diagnostic()
            .wrap_err("Class enumeration pass failed")?;

        debug!("Synthesized {} keep rules", keep.len());
        Ok(keep)
    }

    /// Run the real shrink pass and return the set of classes the engine
    /// would remove, as external names.
    ///
    /// Dependencies are program inputs here, so their classes are removal
    /// candidates too. Every emitted class is written under the tracker's
    /// output root and subtracted from the parsed removed set.
    pub fn find_unused(&self) -> Result<BTreeSet<String>> {
        let mut rules = self.keep_rules()?;
        rules.extend(
            ["-dontoptimize", "-dontobfuscate", "-ignorewarnings"]
                .iter()
                .map(|s| s.to_string()),
        );

        let mut program = self.first_party_inputs()?;
        program.extend(
            self.dependencies
                .iter()
                .cloned()
                .map(ProgramInput::Archive),
        );

        let mut parser = UsageLogParser::new();
        let mut emitted: BTreeSet<String> = BTreeSet::new();
        let layout = self.layout.clone();

        let mut class_sink = |internal: &str, bytes: &[u8]| {
            let external = external_name(internal);
            let path = layout.class_file(&external);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, bytes)?;
            emitted.insert(external);
            Ok(())
        };
        let mut usage_sink = |token: &str| parser.token(token);

        info!("Running shrink analysis ({} inputs)", program.len());
        self.engine
            .run(EngineJob {
                program: &program,
                libraries: &self.base_libraries,
                rules: &rules,
                class_sink: &mut class_sink,
                usage_sink: &mut usage_sink,
            })
            .into_diagnostic()
            .wrap_err("Shrink analysis pass failed")?;

        let mut removed = parser.finish();
        // Emission is authoritative: a class claimed removed by the log but
        // nonetheless written by the engine stays.
        for name in &emitted {
            removed.remove(name);
        }

        info!(
            "{} classes unused, {} retained",
            removed.len(),
            emitted.len()
        );
        Ok(removed)
    }
}
