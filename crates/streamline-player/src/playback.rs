//! Playback stage (CPAL output stream).
//!
//! Builds the CPAL output stream and provides the real-time audio callback.
//! The callback:
//! - copies whole frames from the in-memory buffer at the read cursor
//! - scales every sample by the session volume
//! - wraps the cursor when looping, otherwise pads with silence and signals completion
//! - converts `f32` samples to the device sample format
//!
//! ## Real-time constraints
//! The callback owns the [`PlaybackEngine`] outright: no locks, no allocation and no I/O.
//! Completion is posted with a non-blocking channel send.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, StreamTrait};

use crate::completion::{Completion, StopReason};
use crate::pipeline::OutputStream;

/// Read cursor and gain over a fully decoded, interleaved buffer.
pub struct PlaybackEngine {
    samples: Box<[f32]>,
    channels: usize,
    total_frames: usize,
    cursor: usize,
    volume: f32,
    looping: bool,
    finished: bool,
    completion: Arc<Completion>,
}

impl PlaybackEngine {
    /// Take ownership of `samples` (interleaved, `channels` per frame).
    ///
    /// `volume` is expected to be clamped already (see [`crate::config::clamp_volume`]).
    pub fn new(
        samples: Vec<f32>,
        channels: usize,
        volume: f32,
        looping: bool,
        completion: Arc<Completion>,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(anyhow!("playback needs at least one channel"));
        }
        if samples.len() % channels != 0 {
            return Err(anyhow!(
                "buffer of {} samples is not a whole number of {channels}-channel frames",
                samples.len()
            ));
        }
        let total_frames = samples.len() / channels;
        Ok(Self {
            samples: samples.into_boxed_slice(),
            channels,
            total_frames,
            cursor: 0,
            volume,
            looping,
            finished: false,
            completion,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Next frame to be delivered.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `true` once a non-looping buffer has been delivered in full.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fill `out` completely with the next `out.len() / channels` frames.
    ///
    /// Any trailing samples that do not form a whole frame are silenced.
    pub fn render<T>(&mut self, out: &mut [T])
    where
        T: cpal::Sample + cpal::FromSample<f32>,
    {
        let silence = <T as cpal::Sample>::from_sample::<f32>(0.0);
        let channels = self.channels;
        let frame_count = out.len() / channels;

        if self.finished || self.total_frames == 0 {
            out.fill(silence);
            if !self.looping {
                self.finish();
            }
            return;
        }

        let mut frames_written = 0usize;
        while frames_written < frame_count {
            let frames_remaining = self.total_frames - self.cursor;
            let frames_to_write = (frame_count - frames_written).min(frames_remaining);

            let src_start = self.cursor * channels;
            let dst_start = frames_written * channels;
            let len = frames_to_write * channels;

            let src = &self.samples[src_start..src_start + len];
            let dst = &mut out[dst_start..dst_start + len];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = <T as cpal::Sample>::from_sample::<f32>(*s * self.volume);
            }

            self.cursor += frames_to_write;
            frames_written += frames_to_write;

            if self.cursor == self.total_frames {
                if self.looping {
                    self.cursor = 0;
                } else {
                    self.finish();
                    out[frames_written * channels..].fill(silence);
                    return;
                }
            }
        }

        out[frame_count * channels..].fill(silence);
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.completion.finish();
        }
    }
}

/// Build a CPAL output stream that plays `engine`.
///
/// The stream config must carry the same channel count as the engine buffer; the
/// buffer is expected to be at the stream sample rate already.
/// Stream errors end the session with [`StopReason::StreamError`].
pub fn build_output_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sample_format: cpal::SampleFormat,
    engine: PlaybackEngine,
    completion: &Arc<Completion>,
) -> Result<cpal::Stream> {
    if config.channels as usize != engine.channels() {
        return Err(anyhow!(
            "stream has {} channels but buffer has {}",
            config.channels,
            engine.channels()
        ));
    }

    match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(device, config, engine, completion),
        cpal::SampleFormat::I16 => build_stream::<i16>(device, config, engine, completion),
        cpal::SampleFormat::I32 => build_stream::<i32>(device, config, engine, completion),
        cpal::SampleFormat::U16 => build_stream::<u16>(device, config, engine, completion),
        other => Err(anyhow!("Unsupported sample format: {other:?}")),
    }
}

/// Type-specialized stream builder for CPAL sample formats.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: PlaybackEngine,
    completion: &Arc<Completion>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let completion_err = completion.clone();
    let err_fn = move |err| {
        tracing::warn!("stream error: {err}");
        completion_err.request_stop(StopReason::StreamError);
    };

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| engine.render(data),
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// [`OutputStream`] over a built CPAL stream.
///
/// Dropping it closes the device and releases the engine buffer held by the callback.
pub struct CpalOutput {
    stream: cpal::Stream,
}

impl CpalOutput {
    pub fn new(stream: cpal::Stream) -> Self {
        Self { stream }
    }
}

impl OutputStream for CpalOutput {
    fn start(&mut self) -> Result<()> {
        self.stream.play()?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stream.pause()?;
        Ok(())
    }
}
