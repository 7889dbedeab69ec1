//! WAV codec built on `hound`.
//!
//! Samples are held as interleaved `f64` normalized to [-1.0, 1.0]. Integer
//! PCM is scaled by 2^(bits-1), which keeps decode → encode sample-exact for
//! every supported bit depth.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from the codec layer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The path does not name an existing file.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// hound rejected the data.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Integer PCM with a bit depth hound cannot round-trip.
    #[error("unsupported bits per sample: {bits}")]
    UnsupportedBitsPerSample {
        /// The bit depth found in the header.
        bits: u16,
    },

    /// I/O error while staging or persisting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Signed integer PCM.
    Int,
    /// IEEE float.
    Float,
}

/// Format parameters preserved across every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavFormat {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Integer or float samples.
    pub sample_kind: SampleKind,
}

impl WavFormat {
    /// Same format with a different channel count.
    pub fn with_channels(self, channels: u16) -> Self {
        Self { channels, ..self }
    }

    /// True when sample rate, bit depth and sample kind match (channel count
    /// is ignored).
    pub fn is_compatible(&self, other: &WavFormat) -> bool {
        self.sample_rate == other.sample_rate
            && self.bits_per_sample == other.bits_per_sample
            && self.sample_kind == other.sample_kind
    }

    fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: match self.sample_kind {
                SampleKind::Int => hound::SampleFormat::Int,
                SampleKind::Float => hound::SampleFormat::Float,
            },
        }
    }
}

impl fmt::Display for WavFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.sample_kind {
            SampleKind::Int => "int",
            SampleKind::Float => "float",
        };
        write!(
            f,
            "{} Hz / {}-bit {}",
            self.sample_rate, self.bits_per_sample, kind
        )
    }
}

/// Decoded audio: interleaved (frame-major) samples plus their format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Format of the samples.
    pub format: WavFormat,
    /// Interleaved samples normalized to [-1.0, 1.0].
    pub samples: Vec<f64>,
}

impl AudioBuffer {
    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        match self.channels() {
            0 => 0,
            n => self.samples.len() / n,
        }
    }

    /// Samples of one channel (0-based).
    pub fn channel(&self, index: usize) -> Vec<f64> {
        self.samples
            .iter()
            .skip(index)
            .step_by(self.channels().max(1))
            .copied()
            .collect()
    }

    /// Interleaves per-channel sample vectors. Shorter channels are padded
    /// with silence to the longest one.
    pub fn from_channels(channels: &[Vec<f64>], format: WavFormat) -> Self {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        let mut samples = Vec::with_capacity(frames * channels.len());
        for frame in 0..frames {
            for channel in channels {
                samples.push(channel.get(frame).copied().unwrap_or(0.0));
            }
        }
        Self {
            format: format.with_channels(channels.len() as u16),
            samples,
        }
    }

    /// Average of all channels as a mono buffer.
    pub fn mixdown(&self) -> Self {
        let channels = self.channels().max(1);
        let samples = self
            .samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect();
        Self {
            format: self.format.with_channels(1),
            samples,
        }
    }

    /// A single channel as a mono buffer.
    pub fn extract(&self, index: usize) -> Self {
        Self {
            format: self.format.with_channels(1),
            samples: self.channel(index),
        }
    }
}

/// Decodes the WAV file at `path`.
pub fn decode(path: &Path) -> Result<AudioBuffer, CodecError> {
    if !path.is_file() {
        return Err(CodecError::NotFound(path.to_path_buf()));
    }

    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample)?;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(AudioBuffer {
        format: WavFormat {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_kind: match spec.sample_format {
                hound::SampleFormat::Int => SampleKind::Int,
                hound::SampleFormat::Float => SampleKind::Float,
            },
        },
        samples,
    })
}

/// Writes `buffer` to a temporary file next to `target`.
///
/// The caller persists the returned file over `target`; dropping it
/// instead discards the write and leaves `target` untouched.
pub fn encode_staged(target: &Path, buffer: &AudioBuffer) -> Result<NamedTempFile, CodecError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".multiwav-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    {
        let mut writer =
            hound::WavWriter::new(BufWriter::new(staged.as_file_mut()), buffer.format.spec())?;
        match buffer.format.sample_kind {
            SampleKind::Int => {
                let scale = int_scale(buffer.format.bits_per_sample)?;
                for &sample in &buffer.samples {
                    writer.write_sample(quantize(sample, scale))?;
                }
            }
            SampleKind::Float => {
                for &sample in &buffer.samples {
                    writer.write_sample(sample as f32)?;
                }
            }
        }
        writer.finalize()?;
    }

    Ok(staged)
}

/// Writes `buffer` to `path`, replacing any existing file atomically.
pub fn encode(path: &Path, buffer: &AudioBuffer) -> Result<(), CodecError> {
    let staged = encode_staged(path, buffer)?;
    staged.persist(path).map_err(|e| CodecError::Io(e.error))?;
    Ok(())
}

fn int_scale(bits: u16) -> Result<f64, CodecError> {
    match bits {
        8 | 16 | 24 | 32 => Ok((1u64 << (bits - 1)) as f64),
        bits => Err(CodecError::UnsupportedBitsPerSample { bits }),
    }
}

fn quantize(sample: f64, scale: f64) -> i32 {
    (sample * scale).round().clamp(-scale, scale - 1.0) as i32
}
