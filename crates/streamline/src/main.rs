//! Streamline: a small CLI player that decodes an audio file into memory and plays
//! it via CPAL.
//!
//! ## Pipeline
//! 1. **Decode**: Symphonia decodes the whole file into one interleaved `f32` buffer.
//! 2. **Conform**: if the device cannot take the source layout, the buffer is remixed
//!    and resampled once with Rubato.
//! 3. **Playback**: the CPAL callback copies frames from the buffer, applies volume,
//!    loops or pads the tail with silence, then wakes the main thread.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamline::{cli, config::PlayConfig, runtime};

fn main() -> ExitCode {
    let args = cli::Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,streamline=info,streamline_player=info")
        }))
        .init();

    runtime::exit_code(run(&args))
}

fn run(args: &cli::Args) -> Result<()> {
    if args.list_devices {
        return runtime::list_devices();
    }

    let config = PlayConfig::from_args(args)?;
    let reason = runtime::run_play(config)?;
    tracing::info!(?reason, "done");
    Ok(())
}
