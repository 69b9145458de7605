use std::path::PathBuf;

use clap::Parser;

use streamline_player::config::DEFAULT_VOLUME;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "streamline", version = VERSION, about = "Play an audio file from memory")]
pub struct Args {
    /// Path to audio file
    #[arg(required_unless_present = "list_devices")]
    pub path: Option<PathBuf>,

    /// Output gain, clamped to 0.0..=1.0
    #[arg(long, default_value_t = DEFAULT_VOLUME, allow_negative_numbers = true)]
    pub volume: f32,

    /// Loop the file until interrupted
    #[arg(long = "loop")]
    pub looping: bool,

    /// List output devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Use a specific output device by substring match
    #[arg(long)]
    pub device: Option<String>,

    /// Resampler input chunk size in frames (used only when the device rate differs)
    #[arg(long, default_value_t = 1024)]
    pub chunk_frames: usize,
}
