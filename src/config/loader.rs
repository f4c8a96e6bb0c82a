use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an unused-class analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First-party class output directories (expanded recursively)
    pub class_dirs: Vec<PathBuf>,

    /// Exported/API archives - part of the program, never stripped
    pub api_archives: Vec<PathBuf>,

    /// Dependency archives eligible for minimization
    pub minimize: Vec<PathBuf>,

    /// Base (JDK) library paths supplied by the hosting environment
    pub base_libraries: Vec<PathBuf>,

    /// Temporary output root; defaults to build/shrinkaudit-tmp under the
    /// project root
    pub temp_root: Option<PathBuf>,

    /// Shrinker engine invocation settings
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Java executable used to launch the engine
    pub java: PathBuf,

    /// Path to the ProGuard-compatible engine jar
    pub jar: Option<PathBuf>,

    /// Extra JVM flags passed before -jar
    pub jvm_flags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_dirs: vec![],
            api_archives: vec![],
            minimize: vec![],
            base_libraries: vec![],
            temp_root: None,
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: None,
            jvm_flags: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a file (TOML or JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            "json" => serde_json::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse JSON config"),
            _ => {
                // Try TOML first, then JSON
                if let Ok(config) = toml::from_str(&contents) {
                    Ok(config)
                } else {
                    serde_json::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".shrinkaudit.toml",
            "shrinkaudit.toml",
            ".shrinkaudit.json",
            "shrinkaudit.json",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// The temporary output root for this run, anchored at the project root
    /// unless overridden.
    pub fn resolved_temp_root(&self, project_root: &Path) -> PathBuf {
        self.temp_root
            .clone()
            .unwrap_or_else(|| project_root.join("build").join("shrinkaudit-tmp"))
    }
}
