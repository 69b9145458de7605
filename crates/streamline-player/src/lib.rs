//! In-memory audio file playback: decode a whole track, then feed it to a CPAL
//! output stream from a lock-free callback with volume, looping and silence padding.

pub mod completion;
pub mod config;
pub mod convert;
pub mod decode;
pub mod device;
pub mod pipeline;
pub mod playback;
pub mod resample;
