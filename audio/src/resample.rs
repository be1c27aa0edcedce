//! Sample rate conversion using rubato.
//!
//! FFT-based fixed in/out resampler, pure Rust. The detection input is
//! a short offline clip, so the whole signal is pushed through in
//! fixed-size blocks and the tail block is zero-padded.

use rubato::{FftFixedInOut, Resampler as RubatoResampler};
use thiserror::Error;

/// Error type for resampling operations.
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("rubato error: {0}")]
    Rubato(String),
}

impl From<rubato::ResamplerConstructionError> for ResampleError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        ResampleError::Rubato(e.to_string())
    }
}

impl From<rubato::ResampleError> for ResampleError {
    fn from(e: rubato::ResampleError) -> Self {
        ResampleError::Rubato(e.to_string())
    }
}

/// Converts a mono signal from `src_rate` to `dst_rate`.
///
/// Equal rates pass through unchanged. The output length is the input
/// length scaled by the rate ratio, rounded up to the resampler's block
/// size; the caller fits the final model length afterwards.
pub fn resample(samples: &[f32], src_rate: u32, dst_rate: u32) -> Result<Vec<f32>, ResampleError> {
    if src_rate == dst_rate {
        return Ok(samples.to_vec());
    }

    // Frames per processing block.
    let chunk_size = 1024;
    let mut resampler =
        FftFixedInOut::<f32>::new(src_rate as usize, dst_rate as usize, chunk_size, 1)?;

    let mut output = Vec::with_capacity(
        (samples.len() as u64 * dst_rate as u64 / src_rate as u64) as usize + chunk_size,
    );
    let mut input_buf = vec![vec![0.0f32; 0]];
    let mut output_buf = vec![vec![0.0f32; resampler.output_frames_max()]];

    let mut pos = 0;
    while pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end = usize::min(pos + frames_needed, samples.len());

        input_buf[0].clear();
        input_buf[0].extend_from_slice(&samples[pos..end]);
        input_buf[0].resize(frames_needed, 0.0);

        let (_, frames_written) =
            resampler.process_into_buffer(&input_buf, &mut output_buf, None)?;
        output.extend_from_slice(&output_buf[0][..frames_written]);

        pos = end;
    }

    Ok(output)
}
