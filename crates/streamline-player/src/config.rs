/// Default output gain applied to every sample.
pub const DEFAULT_VOLUME: f32 = 0.2;

/// Playback parameters shared by the decode, conversion and playback stages.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackConfig {
    /// Linear gain in `[0, 1]`. Use [`PlaybackConfig::with_volume`] to set it.
    pub volume: f32,
    /// Restart from the first frame instead of stopping at the end of the buffer.
    pub looping: bool,
    /// Resampler input chunk size in frames, used only when the device rate differs.
    pub chunk_frames: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            looping: false,
            chunk_frames: 1024,
        }
    }
}

impl PlaybackConfig {
    /// Set the volume, clamped to `[0, 1]`.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = clamp_volume(volume);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_chunk_frames(mut self, chunk_frames: usize) -> Self {
        self.chunk_frames = chunk_frames.max(1);
        self
    }
}

/// Clamp a requested gain to `[0, 1]`.
///
/// Non-finite values fall back to [`DEFAULT_VOLUME`].
pub fn clamp_volume(volume: f32) -> f32 {
    if !volume.is_finite() {
        tracing::warn!(requested = volume, "invalid volume; using default");
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}
