//! shrinkaudit - Find out what a shrinker would remove, without shrinking
//!
//! This library determines, for a set of compiled JVM classes and their
//! dependency archives, which classes a whole-program reachability analysis
//! (a ProGuard-compatible shrinker) would eliminate. The real output
//! artifact is never shrunk; the result is a set of unused class names that
//! a packaging pipeline can use to exclude unreachable classes from merged
//! dependency archives.
//!
//! # Architecture
//!
//! The analysis is a two-pass protocol around an external engine:
//! 1. **Input Discovery** - Find all compiled .class files and archives
//! 2. **Enumeration Pass** - Run the engine with shrinking disabled and
//!    synthesize a keep rule for every class it emits
//! 3. **Shrink Pass** - Run the engine for real, seeded with those rules
//! 4. **Usage-Log Parsing** - Rebuild the removed set from the engine's
//!    text diagnostic stream
//! 5. **Reconciliation** - Classes the engine actually emitted override
//!    removal claims parsed from the log
//! 6. **Reporting** - Output the unused set in various formats

pub mod config;
pub mod discovery;
pub mod engine;
pub mod names;
pub mod report;
pub mod tracker;

pub use config::{Config, EngineConfig};
pub use discovery::{ClassFileCollector, ProgramInput};
pub use engine::{EngineError, EngineJob, ProcessEngine, ShrinkEngine};
pub use names::{external_name, internal_name, OutputLayout};
pub use report::{ReportFormat, Reporter};
pub use tracker::{UnusedTracker, UsageLogParser};
