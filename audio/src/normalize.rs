//! Channel downmix and fixed-length fitting.

/// Averages interleaved multi-channel samples into a mono signal.
///
/// Mono input is returned as-is. A trailing partial frame is dropped.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(frames);
    for frame in 0..frames {
        let start = frame * channels;
        let sum: f32 = interleaved[start..start + channels].iter().sum();
        mono.push(sum / channels as f32);
    }
    mono
}

/// Fits `samples` to exactly `len` samples.
///
/// Longer input keeps the leading window; shorter input is zero-padded
/// at the end.
pub fn fit_length(mut samples: Vec<f32>, len: usize) -> Vec<f32> {
    if samples.len() > len {
        samples.truncate(len);
    } else {
        samples.resize(len, 0.0);
    }
    samples
}
