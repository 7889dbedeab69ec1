//! Signal classification of decoded audio.
//!
//! Derives the facts the resolver acts on: silence, which channels carry
//! signal, left/right correlation and whether a stereo file is "fake".

use serde::{Deserialize, Serialize};

use crate::options::Options;
use crate::wav::AudioBuffer;

/// Thresholds used by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Whole-file silence floor in dBFS.
    pub null_db: f64,
    /// Per-channel signal floor in dBFS.
    pub empty_db: f64,
    /// Correlation above which two channels are redundant.
    pub correlation: f64,
}

impl From<&Options> for Thresholds {
    fn from(options: &Options) -> Self {
        Self {
            null_db: options.null_threshold,
            empty_db: options.empty_threshold,
            correlation: options.correlation_threshold,
        }
    }
}

/// Which channels of a file carry signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidChannel {
    /// No channel carries signal.
    Silent,
    /// The first channel alone is enough (mono, left-only, or a redundant
    /// stereo pair where left is the louder side).
    Left,
    /// The second channel alone is enough.
    Right,
    /// Channels carry independent signal.
    Both,
}

impl ValidChannel {
    /// Channel index to keep when collapsing to mono, if a single one suffices.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Left => Some(0),
            Self::Right => Some(1),
            Self::Silent | Self::Both => None,
        }
    }
}

/// Facts derived from one file's samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Channel count.
    pub channels: u16,
    /// Sample frames per channel.
    pub frames: usize,
    /// Peak level across all channels in dBFS.
    pub peak_db: f64,
    /// Peak level of each channel in dBFS.
    pub channel_peaks_db: Vec<f64>,
    /// Every sample is at or below the null threshold.
    pub is_empty: bool,
    /// Zero-lag normalized cross-correlation of a stereo pair.
    pub correlation: Option<f64>,
    /// Correlation exceeds the threshold. `None` unless the file is stereo.
    pub is_correlated: Option<bool>,
    /// Which channels carry signal.
    pub valid_channel: ValidChannel,
    /// Stereo, not silent, channels correlated.
    pub is_fake_stereo: bool,
}

impl Classification {
    /// Mono and not silent.
    pub fn is_mono(&self) -> bool {
        self.channels == 1 && !self.is_empty
    }
}

/// Converts a linear amplitude to dBFS.
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * amplitude.log10()
    }
}

/// Converts dBFS to a linear amplitude.
pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Peak absolute amplitude of a sample sequence.
pub fn peak(samples: impl IntoIterator<Item = f64>) -> f64 {
    samples.into_iter().map(f64::abs).fold(0.0, f64::max)
}

/// Zero-lag normalized cross-correlation. Returns 0.0 when either side has
/// no energy.
pub fn correlation(left: &[f64], right: &[f64]) -> f64 {
    let (mut lr, mut ll, mut rr) = (0.0, 0.0, 0.0);
    for (&l, &r) in left.iter().zip(right) {
        lr += l * r;
        ll += l * l;
        rr += r * r;
    }
    let norm = (ll * rr).sqrt();
    if norm <= 0.0 {
        0.0
    } else {
        (lr / norm).clamp(-1.0, 1.0)
    }
}

/// Classifies a decoded buffer.
pub fn classify(buffer: &AudioBuffer, thresholds: &Thresholds) -> Classification {
    let channels = buffer.channels();
    let channel_data: Vec<Vec<f64>> = (0..channels).map(|c| buffer.channel(c)).collect();
    let channel_peaks: Vec<f64> = channel_data.iter().map(|c| peak(c.iter().copied())).collect();
    let file_peak = channel_peaks.iter().copied().fold(0.0, f64::max);

    let is_empty = file_peak <= db_to_amplitude(thresholds.null_db);
    let empty_floor = db_to_amplitude(thresholds.empty_db);
    let live: Vec<bool> = channel_peaks.iter().map(|&p| p > empty_floor).collect();

    let coefficient = (channels == 2).then(|| correlation(&channel_data[0], &channel_data[1]));
    let is_correlated = coefficient.map(|c| c > thresholds.correlation);

    let valid_channel = match live.iter().filter(|&&l| l).count() {
        0 => ValidChannel::Silent,
        1 if live[0] => ValidChannel::Left,
        1 if channels == 2 => ValidChannel::Right,
        _ if is_correlated == Some(true) => {
            if channel_peaks[1] > channel_peaks[0] {
                ValidChannel::Right
            } else {
                ValidChannel::Left
            }
        }
        _ => ValidChannel::Both,
    };

    let is_fake_stereo = channels == 2 && !is_empty && is_correlated == Some(true);

    Classification {
        channels: channels as u16,
        frames: buffer.frames(),
        peak_db: amplitude_to_db(file_peak),
        channel_peaks_db: channel_peaks.into_iter().map(amplitude_to_db).collect(),
        is_empty,
        correlation: coefficient,
        is_correlated,
        valid_channel,
        is_fake_stereo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{SampleKind, WavFormat};

    fn thresholds() -> Thresholds {
        Thresholds::from(&Options::default())
    }

    fn stereo(left: &[f64], right: &[f64]) -> AudioBuffer {
        AudioBuffer::from_channels(
            &[left.to_vec(), right.to_vec()],
            WavFormat {
                channels: 2,
                sample_rate: 44100,
                bits_per_sample: 16,
                sample_kind: SampleKind::Int,
            },
        )
    }

    fn sine(len: usize, gain: f64) -> Vec<f64> {
        (0..len).map(|i| (i as f64 * 0.05).sin() * gain).collect()
    }

    fn triangle(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let phase = (i % 40) as f64 / 40.0;
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            })
            .collect()
    }

    #[test]
    fn test_identical_channels_are_fake_stereo() {
        let s = sine(4410, 0.5);
        let c = classify(&stereo(&s, &s), &thresholds());
        assert!(!c.is_empty);
        assert_eq!(c.is_correlated, Some(true));
        assert!(c.is_fake_stereo);
        assert_eq!(c.valid_channel, ValidChannel::Left);
    }

    #[test]
    fn test_scaled_copy_is_correlated() {
        let c = classify(&stereo(&sine(4410, 0.5), &sine(4410, 0.9)), &thresholds());
        assert_eq!(c.is_correlated, Some(true));
        assert!(c.is_fake_stereo);
        assert_eq!(c.valid_channel, ValidChannel::Right);
    }

    #[test]
    fn test_different_channels_are_true_stereo() {
        let c = classify(&stereo(&sine(4410, 0.5), &triangle(4410)), &thresholds());
        assert_eq!(c.is_correlated, Some(false));
        assert!(!c.is_fake_stereo);
        assert_eq!(c.valid_channel, ValidChannel::Both);
    }

    #[test]
    fn test_one_silent_channel() {
        let c = classify(&stereo(&vec![0.0; 4410], &sine(4410, 0.5)), &thresholds());
        assert!(!c.is_empty);
        assert_eq!(c.is_correlated, Some(false));
        assert_eq!(c.valid_channel, ValidChannel::Right);
        assert_eq!(c.channel_peaks_db[0], f64::NEG_INFINITY);
    }

    #[test]
    fn test_silence() {
        let c = classify(&stereo(&vec![0.0; 100], &vec![0.0; 100]), &thresholds());
        assert!(c.is_empty);
        assert!(!c.is_fake_stereo);
        assert_eq!(c.valid_channel, ValidChannel::Silent);
        assert!(!c.is_mono());
    }

    #[test]
    fn test_null_threshold_is_inclusive() {
        let floor = db_to_amplitude(-40.0);
        let buffer = stereo(&[floor, 0.0], &[0.0, -floor]);
        let t = Thresholds {
            null_db: -40.0,
            ..thresholds()
        };
        assert!(classify(&buffer, &t).is_empty);
    }

    #[test]
    fn test_mono_has_no_correlation() {
        let buffer = stereo(&sine(100, 0.5), &sine(100, 0.5)).extract(0);
        let c = classify(&buffer, &thresholds());
        assert_eq!(c.channels, 1);
        assert_eq!(c.correlation, None);
        assert_eq!(c.is_correlated, None);
        assert!(c.is_mono());
    }

    #[test]
    fn test_db_conversions() {
        assert_eq!(amplitude_to_db(0.0), f64::NEG_INFINITY);
        assert!((amplitude_to_db(1.0)).abs() < 1e-12);
        assert!((db_to_amplitude(-20.0) - 0.1).abs() < 1e-12);
    }
}
