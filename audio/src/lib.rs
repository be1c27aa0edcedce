//! Audio decoding and normalization.
//!
//! Turns an audio file of arbitrary container, sample rate, and channel
//! count into the fixed-shape buffer the detection models expect:
//!
//! 1. [`decode`]: symphonia probe + decode -> interleaved f32 frames
//! 2. [`resample`]: rubato FFT resampler -> 16 kHz
//! 3. [`normalize`]: mono downmix + truncate/zero-pad -> exactly
//!    [`MAX_SAMPLES`] samples
//!
//! The whole chain is exposed as [`load_and_normalize`].

mod decode;
mod error;
mod normalize;
mod resample;

use std::path::Path;

pub use decode::{decode, DecodedAudio};
pub use error::AudioError;
pub use normalize::{downmix_to_mono, fit_length};
pub use resample::{resample, ResampleError};

/// Target sample rate for model input.
pub const SAMPLE_RATE: u32 = 16000;

/// Fixed model input length in samples (~4.04 s at 16 kHz).
pub const MAX_SAMPLES: usize = 64_600;

/// A mono 16 kHz waveform of exactly [`MAX_SAMPLES`] samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Wraps a sample vector, padding or truncating to [`MAX_SAMPLES`].
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self {
            samples: fit_length(samples, MAX_SAMPLES),
        }
    }

    /// The normalized samples. Always exactly [`MAX_SAMPLES`] long.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decodes an audio file and normalizes it to a model-ready buffer.
///
/// Multi-channel audio is averaged to mono, resampled to 16 kHz when
/// needed, then truncated to the leading [`MAX_SAMPLES`] samples or
/// zero-padded at the end.
pub fn load_and_normalize(path: &Path) -> Result<AudioBuffer, AudioError> {
    let decoded = decode(path)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    if mono.is_empty() {
        return Err(AudioError::EmptyStream {
            path: path.to_path_buf(),
        });
    }
    let at_rate = if decoded.sample_rate == SAMPLE_RATE {
        mono
    } else {
        resample(&mono, decoded.sample_rate, SAMPLE_RATE).map_err(|source| {
            AudioError::Resample {
                path: path.to_path_buf(),
                source,
            }
        })?
    };
    Ok(AudioBuffer::from_samples(at_rate))
}
