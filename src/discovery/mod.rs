mod class_finder;

pub use class_finder::{ClassFileCollector, ProgramInput};
