use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use waterfall::{
    app::AppOptions,
    audio::PlaybackSource,
    config::WaterfallConfig,
};

/// Real-time audio spectrum waterfall for the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Audio file to play; a sine tone is played when omitted
    path: Option<PathBuf>,

    /// Frequency of the fallback tone in Hz
    #[arg(long, default_value_t = 440.0)]
    tone: f32,

    /// Samples kept in the capture buffer
    #[arg(long, default_value_t = 16384)]
    capacity: usize,

    /// Write logs to this file (RUST_LOG selects the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal is taken over by the UI, so logs only go to a file
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = WaterfallConfig::default();
    let span = config.frame_span();
    if cli.capacity < span {
        bail!(
            "--capacity must be at least {span} samples (one decimated frame), got {}",
            cli.capacity
        );
    }

    let source = match cli.path {
        Some(path) => PlaybackSource::File(path),
        None => PlaybackSource::Tone(cli.tone),
    };

    waterfall::ui::run(AppOptions {
        source,
        capture_capacity: cli.capacity,
        config,
    })
}
