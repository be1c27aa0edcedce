//! Shared ONNX Runtime session construction.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{builder::GraphOptimizationLevel, Session};

use crate::DetectError;

/// Builds an inference session for a pretrained artifact.
///
/// Sessions run single-threaded internally; request-level concurrency
/// comes from the server's worker threads. `run` needs exclusive
/// access, so the session is handed out behind a `Mutex`.
pub(crate) fn build_session(
    path: &Path,
    which: &'static str,
    use_cuda: bool,
) -> Result<Mutex<Session>, DetectError> {
    let wrap = move |source| DetectError::ModelLoad { which, source };

    let builder = Session::builder()
        .map_err(wrap)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(wrap)?
        .with_intra_threads(1)
        .map_err(wrap)?
        .with_inter_threads(1)
        .map_err(wrap)?;

    #[cfg(feature = "cuda")]
    let builder = if use_cuda {
        use ort::execution_providers::CUDAExecutionProvider;
        builder
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .map_err(wrap)?
    } else {
        builder
    };
    #[cfg(not(feature = "cuda"))]
    let _ = use_cuda;

    let session = builder.commit_from_file(path).map_err(wrap)?;
    Ok(Mutex::new(session))
}
