//! Integration tests for the two-pass tracker protocol
//!
//! A scripted fake engine stands in for the external shrinker: it records
//! the shape of each job it receives and replays a fixed scenario through
//! the job's sinks, so the orchestration, parsing and reconciliation logic
//! are exercised end to end without a real engine.

use shrinkaudit::{EngineError, EngineJob, ShrinkEngine, UnusedTracker};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// What the fake engine saw for one pass
#[derive(Debug, Clone, Default)]
struct SeenJob {
    program: Vec<PathBuf>,
    libraries: Vec<PathBuf>,
    rules: Vec<String>,
}

impl SeenJob {
    fn is_enumeration(&self) -> bool {
        self.rules.iter().any(|r| r == "-dontshrink")
    }
}

/// A scripted engine. Enumeration passes (shrinking disabled) emit every
/// scripted class; shrink passes emit only the retained subset and stream
/// the scripted usage log.
struct FakeEngine {
    classes: Vec<(String, Vec<u8>)>,
    retained: BTreeSet<String>,
    usage_log: Vec<String>,
    seen: Rc<RefCell<Vec<SeenJob>>>,
}

impl FakeEngine {
    fn new(classes: &[&str], retained: &[&str], usage_log: &[&str]) -> (Self, Rc<RefCell<Vec<SeenJob>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let engine = Self {
            classes: classes
                .iter()
                .map(|name| (name.to_string(), format!("bytes-of-{}", name).into_bytes()))
                .collect(),
            retained: retained.iter().map(|s| s.to_string()).collect(),
            usage_log: usage_log.iter().map(|s| s.to_string()).collect(),
            seen: Rc::clone(&seen),
        };
        (engine, seen)
    }
}

impl ShrinkEngine for FakeEngine {
    fn run(&self, job: EngineJob<'_>) -> Result<(), EngineError> {
        let seen_job = SeenJob {
            program: job.program.iter().map(|p| p.path().to_path_buf()).collect(),
            libraries: job.libraries.to_vec(),
            rules: job.rules.to_vec(),
        };
        let enumeration = seen_job.is_enumeration();
        self.seen.borrow_mut().push(seen_job);

        for (internal, bytes) in &self.classes {
            if enumeration || self.retained.contains(internal) {
                (job.class_sink)(internal, bytes).map_err(EngineError::Io)?;
            }
        }
        if !enumeration {
            for token in &self.usage_log {
                (job.usage_sink)(token);
            }
        }
        Ok(())
    }
}

/// A project with two compiled first-party classes on disk.
fn two_class_project() -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let classes = dir.path().join("classes");
    fs::create_dir_all(classes.join("com/example")).unwrap();
    fs::write(classes.join("com/example/A.class"), b"raw-A").unwrap();
    fs::write(classes.join("com/example/B.class"), b"raw-B").unwrap();
    let dirs = vec![classes];
    (dir, dirs)
}

fn tracker_with(
    engine: FakeEngine,
    class_dirs: Vec<PathBuf>,
    to_minimize: Vec<PathBuf>,
    base_libraries: Vec<PathBuf>,
    temp_root: PathBuf,
) -> UnusedTracker<FakeEngine> {
    UnusedTracker::new(engine, class_dirs, vec![], to_minimize, base_libraries, temp_root).unwrap()
}

#[test]
fn test_unused_class_is_reported_and_retained_class_is_written() {
    let (project, class_dirs) = two_class_project();
    let (engine, _seen) = FakeEngine::new(
        &["com/example/A", "com/example/B"],
        &["com/example/A"],
        &["com.example.B", "\n"],
    );
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    let unused = tracker.find_unused().unwrap();

    let expected: BTreeSet<String> = ["com.example.B".to_string()].into_iter().collect();
    assert_eq!(unused, expected);

    // The reachable class was written to its resolved path, the dead one
    // was not
    let a_path = tracker.class_file("com.example.A");
    assert!(a_path.exists(), "expected {} to exist", a_path.display());
    assert_eq!(fs::read(&a_path).unwrap(), b"bytes-of-com/example/A");
    assert!(!tracker.class_file("com.example.B").exists());
}

#[test]
fn test_emission_overrides_usage_log_claim() {
    let (project, class_dirs) = two_class_project();
    // The log claims B was removed, but the engine still emits it
    let (engine, _seen) = FakeEngine::new(
        &["com/example/A", "com/example/B"],
        &["com/example/A", "com/example/B"],
        &["com.example.B", "\n"],
    );
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    let unused = tracker.find_unused().unwrap();
    assert!(unused.is_empty(), "emission must win over the log: {:?}", unused);
}

#[test]
fn test_result_is_disjoint_from_emitted_classes() {
    let (project, class_dirs) = two_class_project();
    let (engine, _seen) = FakeEngine::new(
        &["com/example/A", "com/example/B"],
        &["com/example/A"],
        &["com.example.A", "\n", "com.example.B", "\n"],
    );
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    let unused = tracker.find_unused().unwrap();
    assert!(unused.contains("com.example.B"));
    assert!(!unused.contains("com.example.A"));
}

#[test]
fn test_zero_emission_run_keeps_log_set_unmodified() {
    let (project, class_dirs) = two_class_project();
    let (engine, _seen) = FakeEngine::new(
        &["com/example/A", "com/example/B"],
        &[],
        &["com.example.A", "\n", "com.example.B", "\n"],
    );
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    let unused = tracker.find_unused().unwrap();
    assert_eq!(unused.len(), 2);
}

#[test]
fn test_keep_rules_cover_every_emitted_class() {
    let (project, class_dirs) = two_class_project();
    let (engine, _seen) = FakeEngine::new(&["com/example/A", "com/example/B"], &[], &[]);
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    let rules = tracker.keep_rules().unwrap();
    assert_eq!(
        rules,
        vec![
            "-keep class com.example.A { *; }".to_string(),
            "-keep class com.example.B { *; }".to_string(),
        ]
    );
}

#[test]
fn test_dependencies_are_libraries_then_program_inputs() {
    let (project, class_dirs) = two_class_project();
    let dep = project.path().join("dep.jar");
    fs::write(&dep, b"jar").unwrap();
    let base_lib = PathBuf::from("/jdk/rt.jar");

    let (engine, seen) = FakeEngine::new(
        &["com/example/A", "com/example/B"],
        &["com/example/A"],
        &["com.example.B", "\n"],
    );
    let mut tracker = tracker_with(
        engine,
        class_dirs,
        vec![dep.clone()],
        vec![base_lib.clone()],
        project.path().join("tmp"),
    );
    tracker.add_dependency(&dep);

    tracker.find_unused().unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2, "exactly two engine invocations");

    let enumeration = &seen[0];
    let shrink = &seen[1];
    assert!(enumeration.is_enumeration());
    assert!(!shrink.is_enumeration());

    // Pass 1: dependency visible for resolution only
    assert!(enumeration.libraries.contains(&dep));
    assert!(enumeration.libraries.contains(&base_lib));
    assert!(!enumeration.program.contains(&dep));

    // Pass 2: dependency is itself a removal candidate
    assert!(shrink.program.contains(&dep));
    assert!(!shrink.libraries.contains(&dep));
    assert!(shrink.libraries.contains(&base_lib));

    // Pass 2 is seeded with the synthesized keep rules and shrinking stays
    // enabled
    assert!(shrink
        .rules
        .contains(&"-keep class com.example.A { *; }".to_string()));
    assert!(shrink.rules.contains(&"-dontobfuscate".to_string()));
}

#[test]
fn test_first_party_classes_are_expanded_from_directories() {
    let (project, class_dirs) = two_class_project();
    let (engine, seen) = FakeEngine::new(&["com/example/A", "com/example/B"], &[], &[]);
    let tracker = tracker_with(
        engine,
        class_dirs,
        vec![],
        vec![],
        project.path().join("tmp"),
    );

    tracker.keep_rules().unwrap();

    let seen = seen.borrow();
    let program = &seen[0].program;
    assert_eq!(program.len(), 2);
    assert!(program.iter().all(|p| p.extension().unwrap() == "class"));
}

#[test]
fn test_engine_failure_is_fatal() {
    struct FailingEngine;
    impl ShrinkEngine for FailingEngine {
        fn run(&self, _job: EngineJob<'_>) -> Result<(), EngineError> {
            Err(EngineError::Configuration("bad rules".to_string()))
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let tracker = UnusedTracker::new(
        FailingEngine,
        vec![],
        vec![],
        vec![],
        vec![],
        dir.path().join("tmp"),
    )
    .unwrap();

    assert!(tracker.find_unused().is_err());
    assert!(tracker.keep_rules().is_err());
}
