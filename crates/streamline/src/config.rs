use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub use streamline_player::config::PlaybackConfig;

use crate::cli::Args;

#[derive(Clone, Debug)]
pub struct PlayConfig {
    pub path: PathBuf,
    pub device: Option<String>,
    pub playback: PlaybackConfig,
}

impl PlayConfig {
    /// Build a play config from parsed CLI arguments, clamping the volume.
    pub fn from_args(args: &Args) -> Result<Self> {
        let path = args.path.clone().ok_or_else(|| anyhow!("No input file."))?;
        Ok(Self {
            path,
            device: normalize_device_name(args.device.clone()),
            playback: PlaybackConfig::default()
                .with_volume(args.volume)
                .with_looping(args.looping)
                .with_chunk_frames(args.chunk_frames),
        })
    }
}

fn normalize_device_name(device: Option<String>) -> Option<String> {
    device.and_then(|name| {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
