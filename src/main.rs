use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use greyfilter::{plan_batch, run_batch, BatchConfig, FailurePolicy, LogObserver};

#[derive(Parser)]
#[command(name = "greyfilter", version)]
#[command(about = "Convert images to grayscale and smooth CSV signals in one batch")]
struct Cli {
    /// Directory containing the input images and signal tables
    input_dir: Option<PathBuf>,

    /// Directory receiving the outputs (created if missing)
    output_dir: Option<PathBuf>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Moving-average window length
    #[arg(short, long)]
    window: Option<usize>,

    /// Image extension to process (repeatable, replaces the default set)
    #[arg(long = "image-ext", value_name = "EXT")]
    image_ext: Vec<String>,

    /// Signal extension to process (repeatable, replaces the default set)
    #[arg(long = "signal-ext", value_name = "EXT")]
    signal_ext: Vec<String>,

    /// Keep processing after a file fails and report all failures at the end
    #[arg(short, long)]
    keep_going: bool,

    /// List the files that would be processed, then exit
    #[arg(long)]
    dry_run: bool,

    /// Print the resolved configuration as JSON, then exit
    #[arg(long)]
    print_config: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BatchConfig::default(),
        };

        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if !self.image_ext.is_empty() {
            config.image_extensions = self.image_ext.iter().cloned().collect();
        }
        if !self.signal_ext.is_empty() {
            config.signal_extensions = self.signal_ext.iter().cloned().collect();
        }
        if self.keep_going {
            config.failure_policy = FailurePolicy::Continue;
        }

        config.normalize_extensions();
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.resolve_config()?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(true);
    }

    if cli.dry_run {
        let plan = plan_batch(&config)?;
        for path in plan.images.iter().chain(&plan.signals) {
            println!("{}", path.display());
        }
        log::info!("{} file(s) would be processed", plan.len());
        return Ok(true);
    }

    let summary = run_batch(&config, &mut LogObserver)
        .with_context(|| format!("batch run over {} aborted", config.input_dir.display()))?;
    Ok(summary.is_success())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "input_dir": "from_file", "output_dir": "out_file", "window_size": 9 }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "greyfilter",
            "from_cli",
            "--config",
            path.to_str().unwrap(),
            "--window",
            "3",
            "--image-ext",
            ".PNG",
            "--image-ext",
            "Tif",
            "--keep-going",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("from_cli"));
        assert_eq!(config.output_dir, PathBuf::from("out_file"));
        assert_eq!(config.window_size, 3);
        assert_eq!(
            config.image_extensions.iter().collect::<Vec<_>>(),
            ["png", "tif"]
        );
        assert_eq!(config.signal_extensions.iter().collect::<Vec<_>>(), ["csv"]);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["greyfilter"]).unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config, BatchConfig::default());
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }

    #[test]
    fn zero_window_flag_is_rejected() {
        let cli = Cli::try_parse_from(["greyfilter", "--window", "0"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn verbosity_flags_pick_the_level() {
        let cli = Cli::try_parse_from(["greyfilter", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Trace);
        let cli = Cli::try_parse_from(["greyfilter", "-q"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);
        assert!(Cli::try_parse_from(["greyfilter", "-q", "-v"]).is_err());
    }
}
