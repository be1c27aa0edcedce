//! Audio authenticity detection (human speech vs. AI-synthesized speech).
//!
//! # Architecture
//!
//! The pipeline is a single-pass, stateless function per request:
//!
//! 1. `audioguard_audio::load_and_normalize`: file -> 16 kHz mono buffer
//! 2. [`AcousticTokenizer::tokenize`]: buffer -> 7 acoustic token layers
//! 3. [`Classifier::classify`]: token layers -> (real, fake) logits
//! 4. [`score`]: logits -> [`DetectionResult`]
//!
//! Both models are opaque pretrained ONNX artifacts loaded once per
//! process. [`LazyDetector`] wraps the pair behind an initialize-once
//! barrier so concurrent first callers trigger exactly one load.

mod classifier;
mod detector;
mod error;
mod score;
mod session;
mod tokenizer;
mod tokens;

pub use classifier::Classifier;
pub use detector::{Detector, DetectorConfig, DeviceInfo, LazyDetector};
pub use error::DetectError;
pub use score::{score, DetectionResult, LABEL_FAKE, LABEL_REAL};
pub use tokenizer::AcousticTokenizer;
pub use tokens::TokenSet;

use std::path::Path;

/// Number of codebook layers the tokenizer emits.
pub const TOKENIZER_LAYERS: usize = 8;

/// Acoustic layers consumed by the classifier (layer 0 is semantic and
/// discarded by convention).
pub const ACOUSTIC_LAYERS: usize = TOKENIZER_LAYERS - 1;

/// The detection pipeline as seen by the serving front-ends.
///
/// One implementation is the real model pair ([`LazyDetector`]); tests
/// substitute mocks. Implementations must be safe for concurrent use.
pub trait DetectionService: Send + Sync {
    /// Runs the full pipeline on an audio file.
    fn detect(&self, path: &Path) -> Result<DetectionResult, DetectError>;

    /// Reports the active compute device. May trigger the one-time
    /// model load.
    fn device(&self) -> Result<DeviceInfo, DetectError>;
}
