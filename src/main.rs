use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flatpack::{ConfigError, ViewerConfig};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "flatpack.toml";

#[derive(Parser)]
#[command(name = "flatpack", about = "A folding bicycle built from procedural primitives")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in logical pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Window title.
    #[arg(long)]
    title: Option<String>,
}

fn load_config(cli: &Cli) -> Result<ViewerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => ViewerConfig::load(Path::new(DEFAULT_CONFIG))?,
        None => ViewerConfig::default(),
    };

    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    if let Some(title) = &cli.title {
        config.window.title = title.clone();
    }

    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flatpack=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        title = %config.window.title,
        width = config.window.width,
        height = config.window.height,
        "starting flatpack"
    );

    match flatpack::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
