use thiserror::Error;

use audioguard_audio::AudioError;

/// Errors from the detection pipeline.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Audio decode or normalization failure. Per-request, recoverable.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// A weight file is missing or incompatible. Fatal: the process
    /// must not serve without models.
    #[error("failed to load {which} model: {source}")]
    ModelLoad {
        which: &'static str,
        #[source]
        source: ort::Error,
    },

    /// Runtime inference failure.
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    /// Tensor shapes disagree with the model contract, which indicates
    /// a weight/config version mismatch. Not recoverable per-request.
    #[error("model contract violation: {0}")]
    Contract(String),
}
