//! Streamline runtime helpers.
//!
//! Provides device enumeration and local file playback.

use std::process::ExitCode;

use anyhow::{Context, Result};
use cpal::traits::DeviceTrait;

use crate::config::PlayConfig;
use streamline_player::completion::{Completion, StopReason};
use streamline_player::decode::{FrameSource, SymphoniaSource, bitrate_kbps};
use streamline_player::{device, pipeline};

/// List output devices and print them to stdout.
pub fn list_devices() -> Result<()> {
    let host = cpal::default_host();
    device::list_devices(&host)
}

/// Decode and play one local file, returning once playback has ended.
///
/// Ctrl-C ends playback early with an orderly teardown.
pub fn run_play(config: PlayConfig) -> Result<StopReason> {
    let source = SymphoniaSource::open(&config.path)
        .with_context(|| format!("Could not load file: {}", config.path.display()))?;
    let info = source.info();
    tracing::info!(
        codec = info.codec.as_deref().unwrap_or("unknown"),
        bit_depth = info.bit_depth,
        duration_ms = info.duration_ms,
        channels = source.channels(),
        rate_hz = source.sample_rate(),
        bitrate_kbps = bitrate_kbps(source.sample_rate(), source.channels(), info.bit_depth),
        "source (local file)"
    );

    let host = cpal::default_host();
    let device = device::pick_device(&host, config.device.as_deref())?;
    tracing::info!(device = %device.description()?, "output device");

    let completion = Completion::new();
    install_interrupt_handler(&completion);

    tracing::info!(path = %config.path.display(), "playing");
    pipeline::play_source(&device, source, &config.playback, completion)
}

/// Map the outcome of a run to the process exit status, logging the error chain.
pub fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn install_interrupt_handler(completion: &std::sync::Arc<Completion>) {
    let completion = completion.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        completion.request_stop(StopReason::Interrupted);
    }) {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }
}
