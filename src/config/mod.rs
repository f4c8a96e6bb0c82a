mod loader;

pub use loader::{Config, EngineConfig};
