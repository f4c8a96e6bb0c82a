use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{miette, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use shrinkaudit::{
    Config, ProcessEngine, ReportFormat, Reporter, UnusedTracker,
};

/// shrinkaudit - Find out what a shrinker would remove, without shrinking
#[derive(Parser, Debug)]
#[command(name = "shrinkaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First-party class output directories (can be specified multiple times)
    #[arg(long)]
    class_dir: Vec<PathBuf>,

    /// Exported/API archives - never stripped (can be specified multiple times)
    #[arg(long)]
    api_archive: Vec<PathBuf>,

    /// Dependency archives eligible for minimization (can be specified multiple times)
    #[arg(long)]
    minimize: Vec<PathBuf>,

    /// Base (JDK) library paths (can be specified multiple times)
    #[arg(long)]
    library: Vec<PathBuf>,

    /// Path to the ProGuard-compatible engine jar
    #[arg(long, value_name = "FILE")]
    engine_jar: Option<PathBuf>,

    /// Print the synthesized keep rules instead of running the full analysis
    #[arg(long)]
    print_keep_rules: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("shrinkaudit v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    let jar = config
        .engine
        .jar
        .clone()
        .ok_or_else(|| miette!("No engine jar configured (use --engine-jar or the config file)"))?;

    let temp_root = config.resolved_temp_root(&cli.path);
    let engine = ProcessEngine::new(
        config.engine.java.clone(),
        jar,
        config.engine.jvm_flags.clone(),
        temp_root.join("engine"),
    );

    let mut tracker = UnusedTracker::new(
        engine,
        config.class_dirs.clone(),
        config.api_archives.clone(),
        config.minimize.clone(),
        config.base_libraries.clone(),
        temp_root.join("classes"),
    )?;

    for dependency in &config.minimize {
        tracker.add_dependency(dependency);
    }

    if cli.print_keep_rules {
        let spinner = start_spinner("Enumerating program classes...", cli.quiet);
        let rules = tracker.keep_rules()?;
        spinner.finish_and_clear();
        for rule in rules {
            println!("{}", rule);
        }
        return Ok(());
    }

    let spinner = start_spinner("Running shrink analysis...", cli.quiet);
    let unused = tracker.find_unused()?;
    spinner.finish_and_clear();

    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&unused)?;

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(ref path) = cli.config {
        Config::from_file(path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // CLI flags extend and override the file
    config.class_dirs.extend(cli.class_dir.iter().cloned());
    config.api_archives.extend(cli.api_archive.iter().cloned());
    config.minimize.extend(cli.minimize.iter().cloned());
    config.base_libraries.extend(cli.library.iter().cloned());
    if cli.engine_jar.is_some() {
        config.engine.jar = cli.engine_jar.clone();
    }

    if config.class_dirs.is_empty() && config.api_archives.is_empty() {
        eprintln!(
            "{}",
            "Warning: no class directories or API archives configured".yellow()
        );
    }

    Ok(config)
}

fn start_spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
