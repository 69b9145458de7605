//! One-shot format conversion of a decoded buffer.
//!
//! The playback callback copies frames verbatim, so any mismatch between the decoded
//! layout and the device layout is resolved here, once, before the stream starts:
//! - channel mapping (mono↔stereo, best-effort otherwise)
//! - sample-rate conversion via [`crate::resample`]

use anyhow::Result;

use crate::decode::DecodedAudio;
use crate::resample;

/// Remap interleaved frames from `src_channels` to `dst_channels`.
///
/// Mapping rules:
/// - same count: pass-through
/// - stereo → mono: average L/R
/// - mono → N: duplicate channel 0
/// - other layouts: destination channel `c` takes source channel `min(c, src - 1)`
pub fn remix(samples: Vec<f32>, src_channels: usize, dst_channels: usize) -> Vec<f32> {
    if src_channels == dst_channels || src_channels == 0 || dst_channels == 0 {
        return samples;
    }

    let frames = samples.len() / src_channels;
    let mut out = Vec::with_capacity(frames * dst_channels);
    for frame in samples.chunks_exact(src_channels) {
        for dst_ch in 0..dst_channels {
            out.push(map_sample(frame, dst_channels, dst_ch));
        }
    }
    out
}

fn map_sample(frame: &[f32], dst_channels: usize, dst_ch: usize) -> f32 {
    match (frame.len(), dst_channels) {
        (2, 1) => 0.5 * (frame[0] + frame[1]),
        (1, _) => frame[0],
        (src, _) => frame[dst_ch.min(src - 1)],
    }
}

/// Bring `audio` to the device layout: remix first, then resample.
///
/// Returns interleaved samples with `dst_channels` per frame at `dst_rate`.
pub fn conform(
    audio: DecodedAudio,
    dst_channels: usize,
    dst_rate: u32,
    chunk_frames: usize,
) -> Result<Vec<f32>> {
    let DecodedAudio {
        samples,
        channels,
        sample_rate,
        ..
    } = audio;

    if channels != dst_channels {
        tracing::info!(
            from = channels,
            to = dst_channels,
            "remixing channels for output device"
        );
    }
    let samples = remix(samples, channels, dst_channels);

    if sample_rate == dst_rate {
        tracing::info!(rate_hz = dst_rate, "resample skipped");
        return Ok(samples);
    }

    tracing::info!(from_hz = sample_rate, to_hz = dst_rate, "resampling");
    resample::resample_buffer(&samples, dst_channels, sample_rate, dst_rate, chunk_frames)
}
