// Out-of-process engine adapter
//
// Drives a ProGuard-compatible shrinker CLI. The job is rendered to a
// generated configuration file, byte inputs are staged to disk, and after
// the process exits the `-printusage` file and the output directory are
// replayed through the job's sinks.

use super::{EngineError, EngineJob, ShrinkEngine};
use crate::discovery::ProgramInput;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

/// A `ShrinkEngine` backed by `java -jar <engine>`.
pub struct ProcessEngine {
    java: PathBuf,
    jar: PathBuf,
    jvm_flags: Vec<String>,
    /// Scratch root for the generated config, staged inputs, engine output
    /// and usage file. Recreated fresh on every run.
    workdir: PathBuf,
}

impl ProcessEngine {
    pub fn new(java: PathBuf, jar: PathBuf, jvm_flags: Vec<String>, workdir: PathBuf) -> Self {
        Self {
            java,
            jar,
            jvm_flags,
            workdir,
        }
    }

    fn reset_workdir(&self) -> Result<(), EngineError> {
        if self.workdir.exists() {
            fs::remove_dir_all(&self.workdir)?;
        }
        fs::create_dir_all(&self.workdir)?;
        Ok(())
    }

    /// Stage in-memory class bytes to disk so the CLI engine can read them.
    /// Each input gets its own directory to keep origin file names distinct.
    fn stage_inputs(&self, program: &[ProgramInput]) -> Result<Vec<PathBuf>, EngineError> {
        let stage = self.workdir.join("stage");
        let mut staged = Vec::with_capacity(program.len());

        for (index, input) in program.iter().enumerate() {
            match input {
                ProgramInput::Classes { path, bytes } => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_os_string())
                        .unwrap_or_else(|| format!("input{}.class", index).into());
                    let target = stage.join(index.to_string()).join(file_name);
                    fs::create_dir_all(target.parent().expect("staged path has a parent"))?;
                    fs::write(&target, bytes)?;
                    staged.push(target);
                }
                ProgramInput::Archive(path) => staged.push(path.clone()),
            }
        }

        Ok(staged)
    }

    fn render_config(
        &self,
        staged: &[PathBuf],
        libraries: &[PathBuf],
        rules: &[String],
        out_dir: &Path,
        usage_file: &Path,
    ) -> String {
        let mut lines = Vec::new();
        for input in staged {
            lines.push(format!("-injars {}", input.display()));
        }
        for library in libraries {
            lines.push(format!("-libraryjars {}", library.display()));
        }
        lines.push(format!("-outjars {}", out_dir.display()));
        lines.push(format!("-printusage {}", usage_file.display()));
        lines.push(String::new());
        lines.extend(rules.iter().cloned());
        lines.push(String::new());
        lines.join("\n")
    }

    /// Feed the usage file through the sink, one line token and one
    /// separator token per line. A missing file means the engine printed no
    /// usage information (shrinking disabled), which is not an error.
    fn replay_usage(usage_file: &Path, sink: &mut dyn FnMut(&str)) -> Result<(), EngineError> {
        let content = match fs::read_to_string(usage_file) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        for line in content.lines() {
            sink(line);
            sink("\n");
        }
        Ok(())
    }

    /// Walk the engine's output tree and feed every emitted class through
    /// the sink under its internal name.
    fn replay_output(
        out_dir: &Path,
        sink: &mut dyn FnMut(&str, &[u8]) -> std::io::Result<()>,
    ) -> Result<(), EngineError> {
        for entry in WalkDir::new(out_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map(|ext| ext != "class").unwrap_or(true) {
                continue;
            }
            let relative = path
                .strip_prefix(out_dir)
                .expect("output entry is under the output dir");
            let internal = relative
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = fs::read(path)?;
            sink(&internal, &bytes)?;
        }
        Ok(())
    }
}

impl ShrinkEngine for ProcessEngine {
    fn run(&self, job: EngineJob<'_>) -> Result<(), EngineError> {
        if !self.jar.exists() {
            return Err(EngineError::Configuration(format!(
                "engine jar not found: {}",
                self.jar.display()
            )));
        }

        self.reset_workdir()?;
        let out_dir = self.workdir.join("out");
        let usage_file = self.workdir.join("usage.txt");
        let config_file = self.workdir.join("engine.pro");
        fs::create_dir_all(&out_dir)?;

        let staged = self.stage_inputs(job.program)?;
        let config = self.render_config(&staged, job.libraries, job.rules, &out_dir, &usage_file);
        fs::write(&config_file, &config)?;
        debug!("Engine config written to {}", config_file.display());

        let mut command = Command::new(&self.java);
        command
            .args(&self.jvm_flags)
            .arg("-jar")
            .arg(&self.jar)
            .arg(format!("@{}", config_file.display()));

        info!("Invoking shrinker engine: {}", self.jar.display());
        let output = command.output().map_err(|source| EngineError::Launch {
            command: self.java.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Self::replay_usage(&usage_file, job.usage_sink)?;
        Self::replay_output(&out_dir, job.class_sink)?;
        Ok(())
    }
}
