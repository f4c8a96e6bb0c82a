// Shrinker engine interface
//
// The reachability engine is an external collaborator. The tracker core only
// depends on this seam: program data in, library data in, a textual rule
// configuration in, and two callback streams out — the classes the engine
// actually emits, and its free-text usage log.

mod process;

pub use process::ProcessEngine;

use crate::discovery::ProgramInput;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an engine invocation.
///
/// Every variant is fatal for the current pass: the analysis is a one-shot
/// batch run with no retry semantics.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine rejected its configuration: {0}")]
    Configuration(String),
    #[error("Failed to launch engine process `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Engine run failed ({status}):\n{stderr}")]
    Failed { status: String, stderr: String },
    #[error("Engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives every class the engine emits, as `(internal_name, bytes)`.
/// A write failure aborts the run.
pub type ClassSink<'a> = &'a mut dyn FnMut(&str, &[u8]) -> std::io::Result<()>;

/// Receives the engine's usage-log stream as opaque text tokens,
/// normally line-delimited.
pub type UsageSink<'a> = &'a mut dyn FnMut(&str);

/// One engine invocation: inputs, rules, and output sinks.
pub struct EngineJob<'a> {
    /// Application bytecode, candidates for elimination.
    pub program: &'a [ProgramInput],
    /// Bytecode visible for resolution but never eliminated, never emitted.
    pub libraries: &'a [PathBuf],
    /// Rule configuration lines, passed to the engine verbatim.
    pub rules: &'a [String],
    pub class_sink: ClassSink<'a>,
    pub usage_sink: UsageSink<'a>,
}

/// A whole-program reachability engine.
///
/// `run` is synchronous and blocking; it drives both sinks to completion
/// before returning.
pub trait ShrinkEngine {
    fn run(&self, job: EngineJob<'_>) -> Result<(), EngineError>;
}
