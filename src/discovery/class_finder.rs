// Program input discovery
//
// First-party inputs come from two places: the project's class output
// directories, which are expanded recursively into individual .class files,
// and the exported/API archives, which are passed through as paths. The
// engine never sees a directory — only class bytes and archive paths.

use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// One unit of program data handed to the shrinker engine.
#[derive(Debug, Clone)]
pub enum ProgramInput {
    /// A single compiled class, read fully into memory. The origin path is
    /// kept as a tag for staging and diagnostics only.
    Classes { path: PathBuf, bytes: Vec<u8> },
    /// An archive (jar) passed to the engine as a path reference.
    Archive(PathBuf),
}

impl ProgramInput {
    /// The origin path of this input, whatever its kind.
    pub fn path(&self) -> &Path {
        match self {
            ProgramInput::Classes { path, .. } => path,
            ProgramInput::Archive(path) => path,
        }
    }
}

/// Discovers compiled classes under directory roots and combines them with
/// archive files into one ordered, deduplicated input list.
pub struct ClassFileCollector;

impl ClassFileCollector {
    pub fn new() -> Self {
        Self
    }

    /// Find all .class files beneath the given roots, as absolute paths.
    ///
    /// Roots that do not exist contribute nothing; this is not an error
    /// (a source set with no compiled output is a normal state).
    pub fn find_class_files(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = roots
            .par_iter()
            .flat_map(|root| Self::scan_directory(root))
            .collect();
        files.sort();
        files.dedup();
        debug!("Found {} class files under {} roots", files.len(), roots.len());
        files
    }

    fn scan_directory(dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            trace!("Class directory does not exist: {}", dir.display());
            return Vec::new();
        }

        WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext == "class")
                    .unwrap_or(false)
            })
            .map(|entry| {
                let path = entry.into_path();
                trace!("Found class file: {}", path.display());
                fs::canonicalize(&path).unwrap_or(path)
            })
            .collect()
    }

    /// Assemble the full program input list: every class file under `roots`
    /// read into memory, followed by `archives` unchanged.
    pub fn collect_program_inputs(
        &self,
        roots: &[PathBuf],
        archives: &[PathBuf],
    ) -> Result<Vec<ProgramInput>> {
        let mut inputs = Vec::new();

        for path in self.find_class_files(roots) {
            let bytes = fs::read(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read class file: {}", path.display()))?;
            inputs.push(ProgramInput::Classes { path, bytes });
        }

        for archive in archives {
            inputs.push(ProgramInput::Archive(archive.clone()));
        }

        Ok(inputs)
    }
}

impl Default for ClassFileCollector {
    fn default() -> Self {
        Self::new()
    }
}
