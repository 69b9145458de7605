//! Decode stage.
//!
//! Uses Symphonia to:
//! - probe the input container/codec
//! - decode packets into interleaved `f32` samples
//! - materialize the whole track into one zero-initialized buffer before playback starts

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Frames requested per read when the decoder cannot report its length up front.
const UNKNOWN_LENGTH_CHUNK_FRAMES: usize = 4096;

/// A source of interleaved `f32` frames with a fixed channel layout.
///
/// Dropping the source closes it.
pub trait FrameSource {
    /// Interleaved channel count of every frame produced.
    fn channels(&self) -> usize;

    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Total frame count, if the container reports it.
    fn total_frames(&self) -> Option<u64>;

    /// Read up to `out.len() / channels` whole frames into `out`.
    ///
    /// Returns the number of frames written. `Ok(0)` means end of stream.
    fn read_frames(&mut self, out: &mut [f32]) -> Result<usize>;
}

/// Metadata captured while probing the source.
#[derive(Clone, Debug, Default)]
pub struct SourceInfo {
    /// Codec name (best-effort).
    pub codec: Option<String>,
    /// Source bit depth (best-effort).
    pub bit_depth: Option<u16>,
    /// Track duration in milliseconds (best-effort).
    pub duration_ms: Option<u64>,
}

/// Symphonia-backed [`FrameSource`] for a single default track.
pub struct SymphoniaSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    channels: usize,
    sample_rate: u32,
    total_frames: Option<u64>,
    info: SourceInfo,
    pending: Vec<f32>,
    pending_pos: usize,
    deferred_error: Option<anyhow::Error>,
}

impl SymphoniaSource {
    /// Open and probe a local file, using its extension as a format hint.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {:?}", path))?;

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        Self::from_media_source(Box::new(file), hint)
    }

    /// Probe an arbitrary [`MediaSource`] and prepare a decoder for its default track.
    pub fn from_media_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<Self> {
        let mss = MediaSourceStream::new(source, Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .context("probe input format")?;

        let format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| anyhow!("No default audio track"))?;

        let codec_params: CodecParameters = track.codec_params.clone();
        let track_id = track.id;

        let channels = codec_params
            .channels
            .ok_or_else(|| anyhow!("Unknown channels"))?
            .count();
        if channels == 0 {
            return Err(anyhow!("Track reports zero channels"));
        }

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| anyhow!("Unknown sample rate"))?;

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .context("create decoder")?;

        let info = SourceInfo {
            codec: codec_name_from_params(&codec_params),
            bit_depth: codec_params
                .bits_per_sample
                .or(codec_params.bits_per_coded_sample)
                .and_then(|v| u16::try_from(v).ok()),
            duration_ms: duration_ms_from_codec_params(&codec_params),
        };

        Ok(Self {
            format,
            decoder,
            track_id,
            channels,
            sample_rate,
            total_frames: codec_params.n_frames,
            info,
            pending: Vec::new(),
            pending_pos: 0,
            deferred_error: None,
        })
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    /// Decode the next packet of our track into `pending`.
    ///
    /// Returns `Ok(false)` at end of stream.
    fn decode_next_packet(&mut self) -> Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => return Ok(false),
                Err(e) => return Err(anyhow!(e).context("read packet")),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::debug!("skipping undecodable packet: {e}");
                    continue;
                }
                Err(e) => return Err(anyhow!(e).context("decode packet")),
            };

            let mut sample_buf =
                SampleBuffer::<f32>::new(decoded.frames() as u64, *decoded.spec());
            sample_buf.copy_interleaved_ref(decoded);

            self.pending.clear();
            self.pending.extend_from_slice(sample_buf.samples());
            self.pending_pos = 0;
            if !self.pending.is_empty() {
                return Ok(true);
            }
        }
    }
}

impl FrameSource for SymphoniaSource {
    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    fn read_frames(&mut self, out: &mut [f32]) -> Result<usize> {
        if let Some(e) = self.deferred_error.take() {
            return Err(e);
        }

        let want = (out.len() / self.channels) * self.channels;
        let mut written = 0usize;

        while written < want {
            if self.pending_pos >= self.pending.len() {
                match self.decode_next_packet() {
                    Ok(true) => {}
                    Ok(false) => break,
                    // Hand back what we already have; report the failure on the next read.
                    Err(e) if written > 0 => {
                        self.deferred_error = Some(e);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            let n = (want - written).min(self.pending.len() - self.pending_pos);
            out[written..written + n]
                .copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + n]);
            self.pending_pos += n;
            written += n;
        }

        Ok(written / self.channels)
    }
}

/// A fully decoded track held in memory.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    /// Interleaved samples, `frames() * channels` long.
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
    /// Frames actually produced by the decoder; may be less than `frames()` on a short read.
    pub frames_decoded: usize,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// `true` when the decoder delivered fewer frames than the buffer holds.
    pub fn is_truncated(&self) -> bool {
        self.frames_decoded < self.frames()
    }
}

/// Outcome of [`fill_buffer`].
#[derive(Debug)]
pub struct FillReport {
    pub frames_read: usize,
    /// Read failure that stopped the fill early, if any.
    pub error: Option<anyhow::Error>,
}

/// Fill `buffer` with successive spans of frames from `source`.
///
/// Stops when the buffer is full, a read returns zero frames, or a read fails.
/// Whatever the buffer held beyond the last frame read is left untouched.
pub fn fill_buffer(source: &mut dyn FrameSource, buffer: &mut [f32]) -> FillReport {
    let channels = source.channels();
    if channels == 0 {
        return FillReport {
            frames_read: 0,
            error: Some(anyhow!("Source reports zero channels")),
        };
    }
    let total_frames = buffer.len() / channels;
    let mut frames_read = 0usize;

    while frames_read < total_frames {
        let offset = frames_read * channels;
        match source.read_frames(&mut buffer[offset..total_frames * channels]) {
            Ok(0) => break,
            Ok(n) => frames_read += n.min(total_frames - frames_read),
            Err(e) => {
                return FillReport {
                    frames_read,
                    error: Some(e),
                };
            }
        }
    }

    FillReport {
        frames_read,
        error: None,
    }
}

/// Decode all of `source` into a zero-initialized buffer.
///
/// When the source reports its length, the buffer is allocated once at that size and
/// any frames the decoder fails to deliver stay silent. Otherwise frames are appended
/// until end of stream. A read failure is logged and truncates the track; it is not
/// returned as an error.
pub fn decode_to_buffer(source: &mut dyn FrameSource) -> Result<DecodedAudio> {
    let channels = source.channels();
    if channels == 0 {
        return Err(anyhow!("Source reports zero channels"));
    }
    let sample_rate = source.sample_rate();

    let (samples, report) = match source.total_frames() {
        Some(total) => {
            let total = usize::try_from(total).context("track too long to buffer")?;
            let len = total
                .checked_mul(channels)
                .ok_or_else(|| anyhow!("track too long to buffer: {total} frames"))?;
            let mut samples = vec![0.0f32; len];
            let report = fill_buffer(source, &mut samples);
            (samples, report)
        }
        None => read_to_end(source, channels),
    };

    let decoded = DecodedAudio {
        samples,
        channels,
        sample_rate,
        frames_decoded: report.frames_read,
    };

    if let Some(e) = report.error {
        tracing::warn!(
            frames_read = decoded.frames_decoded,
            total_frames = decoded.frames(),
            "decode stopped early; remainder plays as silence: {e:#}"
        );
    } else if decoded.is_truncated() {
        tracing::warn!(
            frames_read = decoded.frames_decoded,
            total_frames = decoded.frames(),
            "decoder returned fewer frames than reported"
        );
    }

    tracing::info!(
        frames = decoded.frames(),
        channels,
        rate_hz = sample_rate,
        "decoded to buffer"
    );
    Ok(decoded)
}

fn read_to_end(source: &mut dyn FrameSource, channels: usize) -> (Vec<f32>, FillReport) {
    let mut samples = Vec::new();
    let mut chunk = vec![0.0f32; UNKNOWN_LENGTH_CHUNK_FRAMES * channels];
    let mut frames_read = 0usize;

    loop {
        match source.read_frames(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                samples.extend_from_slice(&chunk[..n * channels]);
                frames_read += n;
            }
            Err(e) => {
                return (
                    samples,
                    FillReport {
                        frames_read,
                        error: Some(e),
                    },
                );
            }
        }
    }

    (
        samples,
        FillReport {
            frames_read,
            error: None,
        },
    )
}

/// Uncompressed PCM bitrate in kbps, when the bit depth is known.
pub fn bitrate_kbps(sample_rate: u32, channels: usize, bit_depth: Option<u16>) -> Option<u64> {
    let bits = u64::from(bit_depth?);
    if bits == 0 {
        return None;
    }
    Some(u64::from(sample_rate) * channels as u64 * bits / 1000)
}

/// Best-effort duration in milliseconds from codec metadata.
///
/// Returns `None` if the container does not provide total frames or sample rate.
fn duration_ms_from_codec_params(codec_params: &CodecParameters) -> Option<u64> {
    let frames = codec_params.n_frames?;
    let rate = codec_params.sample_rate? as u64;
    if rate == 0 {
        return None;
    }
    Some(frames.saturating_mul(1000) / rate)
}

/// Best-effort codec label used in startup logs.
fn codec_name_from_params(params: &CodecParameters) -> Option<String> {
    use symphonia::core::codecs::*;
    let name = match params.codec {
        CODEC_TYPE_FLAC => "FLAC",
        CODEC_TYPE_MP3 => "MP3",
        CODEC_TYPE_AAC => "AAC",
        CODEC_TYPE_ALAC => "ALAC",
        CODEC_TYPE_VORBIS => "VORBIS",
        CODEC_TYPE_OPUS => "OPUS",
        CODEC_TYPE_PCM_S16LE | CODEC_TYPE_PCM_S16BE => "PCM_S16",
        CODEC_TYPE_PCM_S24LE | CODEC_TYPE_PCM_S24BE => "PCM_S24",
        CODEC_TYPE_PCM_S32LE | CODEC_TYPE_PCM_S32BE => "PCM_S32",
        CODEC_TYPE_PCM_F32LE | CODEC_TYPE_PCM_F32BE => "PCM_F32",
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Read, Seek};
    use symphonia::core::codecs::*;

    /// Scripted source: serves `frames` in reads of at most `max_read` frames,
    /// then fails once `fail_after` frames have been delivered.
    pub(crate) struct ScriptedSource {
        pub channels: usize,
        pub frames: Vec<f32>,
        pub reported_frames: Option<u64>,
        pub max_read: usize,
        pub fail_after: Option<usize>,
        pub pos: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(channels: usize, frames: Vec<f32>) -> Self {
            let reported = (frames.len() / channels) as u64;
            Self {
                channels,
                frames,
                reported_frames: Some(reported),
                max_read: 7,
                fail_after: None,
                pos: 0,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn channels(&self) -> usize {
            self.channels
        }

        fn sample_rate(&self) -> u32 {
            48_000
        }

        fn total_frames(&self) -> Option<u64> {
            self.reported_frames
        }

        fn read_frames(&mut self, out: &mut [f32]) -> Result<usize> {
            let delivered = self.pos / self.channels;
            if let Some(limit) = self.fail_after {
                if delivered >= limit {
                    return Err(anyhow!("corrupt frame"));
                }
            }
            let remaining = (self.frames.len() - self.pos) / self.channels;
            let mut n = (out.len() / self.channels).min(remaining).min(self.max_read);
            if let Some(limit) = self.fail_after {
                n = n.min(limit - delivered);
            }
            let len = n * self.channels;
            out[..len].copy_from_slice(&self.frames[self.pos..self.pos + len]);
            self.pos += len;
            Ok(n)
        }
    }

    fn ramp(samples: usize) -> Vec<f32> {
        (1..=samples).map(|v| v as f32).collect()
    }

    #[test]
    fn fill_buffer_reads_in_spans_at_frame_offsets() {
        let mut src = ScriptedSource::new(2, ramp(40));
        let mut buf = vec![0.0; 40];
        let report = fill_buffer(&mut src, &mut buf);
        assert_eq!(report.frames_read, 20);
        assert!(report.error.is_none());
        assert_eq!(buf, ramp(40));
    }

    #[test]
    fn fill_buffer_stops_on_zero_read() {
        let mut src = ScriptedSource::new(1, ramp(5));
        let mut buf = vec![0.0; 8];
        let report = fill_buffer(&mut src, &mut buf);
        assert_eq!(report.frames_read, 5);
        assert_eq!(&buf[5..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn fill_buffer_reports_read_failure() {
        let mut src = ScriptedSource::new(2, ramp(40));
        src.fail_after = Some(9);
        let mut buf = vec![0.0; 40];
        let report = fill_buffer(&mut src, &mut buf);
        assert_eq!(report.frames_read, 9);
        assert!(report.error.is_some());
        assert_eq!(&buf[..18], &ramp(18)[..]);
    }

    #[test]
    fn decode_to_buffer_zero_fills_after_short_read() {
        let mut src = ScriptedSource::new(2, ramp(40));
        src.fail_after = Some(4);
        let decoded = decode_to_buffer(&mut src).unwrap();
        assert_eq!(decoded.frames(), 20);
        assert_eq!(decoded.frames_decoded, 4);
        assert!(decoded.is_truncated());
        assert!(decoded.samples[8..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn decode_to_buffer_handles_unknown_length() {
        let mut src = ScriptedSource::new(2, ramp(10_000));
        src.reported_frames = None;
        src.max_read = 1000;
        let decoded = decode_to_buffer(&mut src).unwrap();
        assert_eq!(decoded.frames(), 5_000);
        assert!(!decoded.is_truncated());
        assert_eq!(decoded.samples, ramp(10_000));
    }

    #[test]
    fn decode_to_buffer_keeps_partial_data_when_unknown_length_fails() {
        let mut src = ScriptedSource::new(1, ramp(100));
        src.reported_frames = None;
        src.fail_after = Some(30);
        let decoded = decode_to_buffer(&mut src).unwrap();
        assert_eq!(decoded.frames(), 30);
        assert_eq!(decoded.sample_rate, 48_000);
    }

    #[test]
    fn duration_ms_from_codec_params_handles_zero_rate() {
        let mut params = CodecParameters::new();
        params.sample_rate = Some(0);
        params.n_frames = Some(100);
        assert!(duration_ms_from_codec_params(&params).is_none());
    }

    #[test]
    fn duration_ms_from_codec_params_computes() {
        let mut params = CodecParameters::new();
        params.sample_rate = Some(48_000);
        params.n_frames = Some(96_000);
        let ms = duration_ms_from_codec_params(&params).unwrap();
        assert_eq!(ms, 2000);
    }

    #[test]
    fn codec_name_from_params_maps_known_codecs() {
        let mut params = CodecParameters::new();
        params.codec = CODEC_TYPE_FLAC;
        assert_eq!(codec_name_from_params(&params), Some("FLAC".to_string()));
        params.codec = CODEC_TYPE_PCM_S16LE;
        assert_eq!(codec_name_from_params(&params), Some("PCM_S16".to_string()));
    }

    #[test]
    fn codec_name_from_params_unknown_returns_none() {
        let params = CodecParameters::new();
        assert!(codec_name_from_params(&params).is_none());
    }

    #[test]
    fn open_missing_file_fails_with_path_context() {
        let err = SymphoniaSource::open(Path::new("/nonexistent/track.flac"))
            .err()
            .expect("missing file must fail");
        assert!(format!("{err:#}").contains("track.flac"));
    }

    #[test]
    fn bitrate_kbps_needs_bit_depth() {
        assert_eq!(bitrate_kbps(44_100, 2, Some(16)), Some(1411));
        assert_eq!(bitrate_kbps(48_000, 1, Some(24)), Some(1152));
        assert_eq!(bitrate_kbps(48_000, 2, None), None);
        assert_eq!(bitrate_kbps(48_000, 2, Some(0)), None);
    }

    const WAV_FRAMES: usize = 10_007;
    const WAV_RATE: u32 = 8_000;

    fn wav_left(frame: usize) -> i16 {
        ((frame % 200) as i16 - 100) * 300
    }

    /// 16-bit stereo PCM WAV; right channel is the negated left channel.
    fn stereo_wav(frames: usize) -> Vec<u8> {
        let channels: u16 = 2;
        let block_align = channels * 2;
        let data_len = (frames * block_align as usize) as u32;

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&WAV_RATE.to_le_bytes());
        out.extend_from_slice(&(WAV_RATE * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for frame in 0..frames {
            let left = wav_left(frame);
            out.extend_from_slice(&left.to_le_bytes());
            out.extend_from_slice(&(-left).to_le_bytes());
        }
        out
    }

    fn wav_hint() -> Hint {
        let mut hint = Hint::new();
        hint.with_extension("wav");
        hint
    }

    /// In-memory media that fails with an I/O error once `fail_at` bytes have been read.
    struct FailingMedia {
        inner: std::io::Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for FailingMedia {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let pos = self.inner.position();
            if pos >= self.fail_at {
                return Err(std::io::Error::other("disk read failed"));
            }
            let allowed = ((self.fail_at - pos) as usize).min(buf.len());
            self.inner.read(&mut buf[..allowed])
        }
    }

    impl Seek for FailingMedia {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    impl MediaSource for FailingMedia {
        fn is_seekable(&self) -> bool {
            true
        }

        fn byte_len(&self) -> Option<u64> {
            Some(self.inner.get_ref().len() as u64)
        }
    }

    #[test]
    fn symphonia_source_reads_wav_in_odd_sized_spans() {
        let bytes = stereo_wav(WAV_FRAMES);
        let mut src =
            SymphoniaSource::from_media_source(Box::new(std::io::Cursor::new(bytes)), wav_hint())
                .unwrap();
        assert_eq!(src.channels(), 2);
        assert_eq!(src.sample_rate(), WAV_RATE);
        assert_eq!(src.total_frames(), Some(WAV_FRAMES as u64));
        assert_eq!(src.info().codec.as_deref(), Some("PCM_S16"));

        // 7-frame reads never line up with packet boundaries, so frames carry over.
        let mut all = Vec::with_capacity(WAV_FRAMES * 2);
        let mut buf = vec![0.0f32; 7 * 2];
        loop {
            let n = src.read_frames(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            assert!(n <= 7);
            all.extend_from_slice(&buf[..n * 2]);
        }

        assert_eq!(all.len(), WAV_FRAMES * 2);
        for frame in [0usize, 1, 6, 7, 199, 1_234, WAV_FRAMES - 1] {
            let expected = wav_left(frame) as f32 / 32_768.0;
            assert_eq!(all[frame * 2], expected, "left @ {frame}");
            assert_eq!(all[frame * 2 + 1], -expected, "right @ {frame}");
        }
    }

    #[test]
    fn symphonia_source_fills_full_buffer() {
        let bytes = stereo_wav(WAV_FRAMES);
        let mut src =
            SymphoniaSource::from_media_source(Box::new(std::io::Cursor::new(bytes)), wav_hint())
                .unwrap();
        let decoded = decode_to_buffer(&mut src).unwrap();
        assert_eq!(decoded.frames(), WAV_FRAMES);
        assert_eq!(decoded.frames_decoded, WAV_FRAMES);
        assert!(!decoded.is_truncated());
        assert_eq!(decoded.samples[3 * 2], wav_left(3) as f32 / 32_768.0);
    }

    #[test]
    fn symphonia_source_truncated_file_ends_early_as_silence() {
        let mut bytes = stereo_wav(WAV_FRAMES);
        bytes.truncate(44 + 4_000 * 4);
        let mut src =
            SymphoniaSource::from_media_source(Box::new(std::io::Cursor::new(bytes)), wav_hint())
                .unwrap();
        let decoded = decode_to_buffer(&mut src).unwrap();
        assert_eq!(decoded.frames(), WAV_FRAMES);
        assert!(decoded.is_truncated());
        assert!(decoded.frames_decoded <= 4_000);
        assert!(
            decoded.samples[decoded.frames_decoded * 2..]
                .iter()
                .all(|&s| s == 0.0)
        );
    }

    #[test]
    fn symphonia_source_defers_read_error_until_next_call() {
        let bytes = stereo_wav(WAV_FRAMES);
        let media = FailingMedia {
            inner: std::io::Cursor::new(bytes),
            fail_at: 44 + 8_000 * 4,
        };
        let mut src = SymphoniaSource::from_media_source(Box::new(media), wav_hint()).unwrap();

        let mut buf = vec![0.0f32; WAV_FRAMES * 2];
        let first = src.read_frames(&mut buf).unwrap();
        assert!(first > 0 && first <= 8_000, "got {first} frames");
        assert_eq!(buf[5 * 2], wav_left(5) as f32 / 32_768.0);

        let err = src.read_frames(&mut buf).unwrap_err();
        assert!(format!("{err:#}").contains("disk read failed"));
    }

    #[test]
    fn fill_buffer_surfaces_symphonia_read_error() {
        let bytes = stereo_wav(WAV_FRAMES);
        let media = FailingMedia {
            inner: std::io::Cursor::new(bytes),
            fail_at: 44 + 8_000 * 4,
        };
        let mut src = SymphoniaSource::from_media_source(Box::new(media), wav_hint()).unwrap();

        let mut buf = vec![0.0f32; WAV_FRAMES * 2];
        let report = fill_buffer(&mut src, &mut buf);
        assert!(report.error.is_some());
        assert!(report.frames_read > 0 && report.frames_read < WAV_FRAMES);
        assert!(buf[report.frames_read * 2..].iter().all(|&s| s == 0.0));
    }
}
