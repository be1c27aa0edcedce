use std::path::PathBuf;

use thiserror::Error;

/// Errors from audio decoding and normalization.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupt audio container {path}: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("no decodable audio track in {path}")]
    NoTrack { path: PathBuf },

    #[error("decode failure in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("audio stream in {path} decoded to zero samples")]
    EmptyStream { path: PathBuf },

    #[error("resampling failed for {path}: {source}")]
    Resample {
        path: PathBuf,
        #[source]
        source: crate::resample::ResampleError,
    },
}
