//! Playback pipeline wiring: decode → conform → output stream → wait → teardown.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::completion::{Completion, StopReason};
use crate::config::PlaybackConfig;
use crate::decode::{self, FrameSource};
use crate::playback::{self, CpalOutput, PlaybackEngine};
use crate::{convert, device};

/// Start/stop control over an output device stream.
pub trait OutputStream {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// A started-or-startable stream plus the decoder that fed it.
///
/// Teardown order is fixed: stop the stream, close the decoder, then drop the stream
/// (which releases the sample buffer held by its callback and closes the device).
/// Each step runs even if an earlier one failed. Dropping the session tears it down.
pub struct PlaybackSession<S: OutputStream> {
    stream: Option<S>,
    decoder: Option<Box<dyn FrameSource>>,
    completion: Arc<Completion>,
}

impl<S: OutputStream> PlaybackSession<S> {
    pub fn new(
        stream: S,
        decoder: Option<Box<dyn FrameSource>>,
        completion: Arc<Completion>,
    ) -> Self {
        Self {
            stream: Some(stream),
            decoder,
            completion,
        }
    }

    /// Start the stream and block until the session ends.
    ///
    /// Returns why playback stopped. A start failure tears the session down and is
    /// returned as an error.
    pub fn run(mut self) -> Result<StopReason> {
        let started = match self.stream.as_mut() {
            Some(stream) => stream.start(),
            None => Ok(()),
        };
        if let Err(e) = started {
            self.teardown();
            return Err(e.context("Failed to start playback device"));
        }
        tracing::info!("playback started");

        let reason = self.completion.wait();
        tracing::info!(?reason, "playback finished");

        self.teardown();
        Ok(reason)
    }

    fn teardown(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.stop() {
                tracing::warn!("stop output stream: {e:#}");
            }
        }
        if let Some(decoder) = self.decoder.take() {
            drop(decoder);
            tracing::debug!("decoder closed");
        }
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("output device closed");
        }
    }
}

impl<S: OutputStream> Drop for PlaybackSession<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Decode `source` fully, open `device` and play until the session ends.
///
/// The buffer is remixed/resampled once if the device cannot take the source layout.
/// `completion` may be shared with a signal handler to interrupt playback.
pub fn play_source<D>(
    device: &cpal::Device,
    mut source: D,
    playback: &PlaybackConfig,
    completion: Arc<Completion>,
) -> Result<StopReason>
where
    D: FrameSource + 'static,
{
    let decoded = decode::decode_to_buffer(&mut source)?;

    let config = device::pick_output_config(device, decoded.channels, decoded.sample_rate)?;
    let mut stream_config: cpal::StreamConfig = config.clone().into();
    if let Some(buf) = device::pick_buffer_size(&config) {
        stream_config.buffer_size = buf;
    }
    tracing::info!(
        source_channels = decoded.channels,
        source_rate_hz = decoded.sample_rate,
        output_channels = stream_config.channels,
        output_rate_hz = stream_config.sample_rate,
        sample_format = ?config.sample_format(),
        buffer_size = ?stream_config.buffer_size,
        "device output config"
    );

    let out_channels = stream_config.channels as usize;
    let samples = convert::conform(
        decoded,
        out_channels,
        stream_config.sample_rate,
        playback.chunk_frames,
    )?;

    let engine = PlaybackEngine::new(
        samples,
        out_channels,
        playback.volume,
        playback.looping,
        completion.clone(),
    )?;
    tracing::info!(
        frames = engine.total_frames(),
        volume = playback.volume,
        looping = playback.looping,
        "playback buffer ready"
    );

    let stream = playback::build_output_stream(
        device,
        &stream_config,
        config.sample_format(),
        engine,
        &completion,
    )
    .context("Failed to open playback device")?;

    PlaybackSession::new(CpalOutput::new(stream), Some(Box::new(source)), completion).run()
}
