use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use preprocess_umd::{Config, Overrides};

/// Copy the region between `preprocess-umd` markers of every source file
/// into the output dir.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// YAML config file, applied before the flags below.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    src_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Begin marker text.
    #[arg(long, value_name = "TEXT")]
    begin: Option<String>,

    /// End marker text.
    #[arg(long, value_name = "TEXT")]
    end: Option<String>,

    /// Skip files whose name ends with this. Pass "" to keep every file.
    #[arg(long, value_name = "SUFFIX")]
    test_suffix: Option<String>,

    /// Skip files matching this gitignore-style glob. Repeatable.
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Delete the output dir before processing.
    #[arg(long)]
    clean: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match &cli.config {
        Some(path) => {
            log::debug!("read config from: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    let config = config.with_overrides(Overrides {
        src_dir: cli.src_dir,
        out_dir: cli.out_dir,
        begin: cli.begin,
        end: cli.end,
        test_suffix: cli.test_suffix,
        exclude: cli.exclude,
    });

    config.validate()?;

    if cli.clean && config.out_dir.try_exists()? {
        log::warn!("output dir `{}` already exists, delete it...", config.out_dir.display());
        fs::remove_dir_all(&config.out_dir).with_context(|| {
            format!("failed to remove output dir: {}", config.out_dir.display())
        })?;
    }

    let report = preprocess_umd::run(config)?;

    log::info!(
        "preprocessed {} file(s), skipped {}",
        report.processed.len(),
        report.skipped.len()
    );

    Ok(())
}
