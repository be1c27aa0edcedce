use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{info, warn};

use audioguard_audio::load_and_normalize;

use crate::{score, AcousticTokenizer, Classifier, DetectError, DetectionResult, DetectionService};

/// Where to find the pretrained artifacts and how to run them.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub tokenizer_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Request the CUDA execution provider. Only effective when the
    /// crate is built with the `cuda` feature.
    pub use_cuda: bool,
}

impl DetectorConfig {
    /// Conventional layout: `<dir>/tokenizer.onnx`, `<dir>/classifier.onnx`.
    pub fn from_weights_dir(dir: &Path) -> Self {
        Self {
            tokenizer_path: dir.join("tokenizer.onnx"),
            classifier_path: dir.join("classifier.onnx"),
            use_cuda: false,
        }
    }
}

/// Active compute context, reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub device: String,
    pub accelerator_available: bool,
}

/// The loaded model pair. Immutable after construction; inference runs
/// in eval mode only, so sharing across request threads is safe.
pub struct Detector {
    tokenizer: AcousticTokenizer,
    classifier: Classifier,
    device: DeviceInfo,
}

impl Detector {
    /// Loads both pretrained artifacts. Errors here mean the process
    /// cannot meaningfully serve and should abort startup.
    pub fn load(config: &DetectorConfig) -> Result<Self, DetectError> {
        let cuda = cfg!(feature = "cuda") && config.use_cuda;
        if config.use_cuda && !cfg!(feature = "cuda") {
            warn!("cuda requested but this build has no cuda support, using cpu");
        }

        info!(path = %config.tokenizer_path.display(), "loading acoustic tokenizer");
        let tokenizer = AcousticTokenizer::load(&config.tokenizer_path, cuda)?;

        info!(path = %config.classifier_path.display(), "loading classifier head");
        let classifier = Classifier::load(&config.classifier_path, cuda)?;

        let device = DeviceInfo {
            device: if cuda { "cuda" } else { "cpu" }.to_string(),
            accelerator_available: cuda,
        };
        info!(device = %device.device, "detection models ready");

        Ok(Self {
            tokenizer,
            classifier,
            device,
        })
    }

    /// Load -> tokenize -> classify -> score, single pass, stateless.
    pub fn detect(&self, path: &Path) -> Result<DetectionResult, DetectError> {
        let buffer = load_and_normalize(path)?;
        let tokens = self.tokenizer.tokenize(&buffer)?;
        let logits = self.classifier.classify(&tokens)?;
        Ok(score(logits))
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }
}

/// Process-scoped detector with an initialize-once barrier.
///
/// Lifecycle: uninitialized -> initializing -> ready. The `OnceCell`
/// guards the transition so concurrent first callers trigger exactly
/// one load. A failed load leaves the cell empty; the error surfaces
/// to every caller of that attempt.
pub struct LazyDetector {
    config: DetectorConfig,
    cell: OnceCell<Detector>,
}

impl LazyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Returns the ready detector, loading it on first use.
    pub fn get(&self) -> Result<&Detector, DetectError> {
        self.cell.get_or_try_init(|| Detector::load(&self.config))
    }

    /// Whether the one-time load has completed.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl DetectionService for LazyDetector {
    fn detect(&self, path: &Path) -> Result<DetectionResult, DetectError> {
        self.get()?.detect(path)
    }

    fn device(&self) -> Result<DeviceInfo, DetectError> {
        Ok(self.get()?.device().clone())
    }
}
