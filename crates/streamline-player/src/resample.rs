//! Whole-buffer resample stage.
//!
//! Uses Rubato to convert a fully decoded interleaved `f32` buffer from the source rate
//! to the output device rate before playback starts. Runs on the calling thread.

use anyhow::{Result, anyhow};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{
    Async, FixedAsync, Indexing, Resampler, SincInterpolationParameters, SincInterpolationType,
    WindowFunction, calculate_cutoff,
};

/// Resample interleaved `samples` from `src_rate` to `dst_rate`.
///
/// Input is fed in chunks of `chunk_frames`; the last chunk is processed as a partial
/// chunk so no trailing frames are dropped. Returns a copy when the rates already match.
pub fn resample_buffer(
    samples: &[f32],
    channels: usize,
    src_rate: u32,
    dst_rate: u32,
    chunk_frames: usize,
) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(anyhow!("cannot resample zero-channel audio"));
    }
    if src_rate == 0 || dst_rate == 0 {
        return Err(anyhow!("invalid sample rate: {src_rate} -> {dst_rate}"));
    }
    if src_rate == dst_rate {
        return Ok(samples.to_vec());
    }

    let f_ratio = dst_rate as f64 / src_rate as f64;

    let sinc_len = 128;
    let oversampling_factor = 256;
    let interpolation = SincInterpolationType::Cubic;
    let window = WindowFunction::BlackmanHarris2;
    let f_cutoff = calculate_cutoff(sinc_len, window);

    let params = SincInterpolationParameters {
        sinc_len,
        f_cutoff,
        interpolation,
        oversampling_factor,
        window,
    };

    let chunk_in_frames = chunk_frames.max(1);
    let mut resampler = Async::<f32>::new_sinc(
        f_ratio,
        1.1,
        &params,
        chunk_in_frames,
        channels,
        FixedAsync::Input,
    )
    .map_err(|e| anyhow!("resampler init error: {e}"))?;

    let total_frames = samples.len() / channels;
    let expected_frames = (total_frames as f64 * f_ratio).ceil() as usize;
    let mut out = Vec::with_capacity(expected_frames * channels);
    let mut out_chunk = vec![0.0f32; resampler.output_frames_max() * channels];

    let mut indexing = Indexing {
        input_offset: 0,
        output_offset: 0,
        active_channels_mask: None,
        partial_len: None,
    };

    let mut start = 0usize;
    while start < total_frames {
        let frames = chunk_in_frames.min(total_frames - start);
        let input = &samples[start * channels..(start + frames) * channels];

        let input_adapter = InterleavedSlice::new(input, channels, frames)
            .map_err(|e| anyhow!("interleaved slice (input) error: {e}"))?;

        let out_capacity_frames = out_chunk.len() / channels;
        let mut output_adapter =
            InterleavedSlice::new_mut(&mut out_chunk, channels, out_capacity_frames)
                .map_err(|e| anyhow!("interleaved slice (output) error: {e}"))?;

        indexing.partial_len = if frames < chunk_in_frames {
            Some(frames)
        } else {
            None
        };

        let (_nbr_in, nbr_out) = resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, Some(&indexing))
            .map_err(|e| anyhow!("resampler process error: {e}"))?;

        out.extend_from_slice(&out_chunk[..nbr_out * channels]);
        start += frames;
    }

    tracing::debug!(
        in_frames = total_frames,
        out_frames = out.len() / channels,
        "resampled buffer"
    );
    Ok(out)
}
