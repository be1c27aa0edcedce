use std::path::Path;
use std::sync::Mutex;

use ndarray::{s, Array3, Ix3};
use ort::session::Session;
use ort::value::Tensor;

use audioguard_audio::{AudioBuffer, MAX_SAMPLES};

use crate::session::build_session;
use crate::{DetectError, TokenSet, TOKENIZER_LAYERS};

/// Pretrained acoustic tokenizer: waveform -> codebook layer embeddings.
///
/// Opaque artifact; the encoder/quantizer hyperparameters travel with
/// the exported graph. Contract:
///
/// - input: `[1, 1, 64600]` f32 waveform
/// - output: `[8, T, D]` f32, one slab per codebook layer
///
/// Layer 0 is semantic and discarded; layers 1..=7 form the
/// [`TokenSet`] consumed by the classifier.
pub struct AcousticTokenizer {
    session: Mutex<Session>,
}

impl AcousticTokenizer {
    /// Loads tokenizer weights. A missing or incompatible checkpoint
    /// is fatal for the process.
    pub fn load(path: &Path, use_cuda: bool) -> Result<Self, DetectError> {
        Ok(Self {
            session: build_session(path, "tokenizer", use_cuda)?,
        })
    }

    /// Runs a frozen forward pass over one normalized buffer.
    pub fn tokenize(&self, buffer: &AudioBuffer) -> Result<TokenSet, DetectError> {
        let input = Array3::from_shape_vec((1, 1, MAX_SAMPLES), buffer.samples().to_vec())
            .map_err(|e| DetectError::Contract(e.to_string()))?;
        let tensor = Tensor::from_array(input)?;

        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![tensor])?;

        let output: ndarray::ArrayViewD<f32> = outputs[0].try_extract_array()?;
        let shape = output.shape();
        if shape.len() != 3 || shape[0] != TOKENIZER_LAYERS {
            return Err(DetectError::Contract(format!(
                "tokenizer output shape {:?}, expected [{}, T, D]",
                shape, TOKENIZER_LAYERS
            )));
        }

        let layers = output
            .to_owned()
            .into_dimensionality::<Ix3>()
            .map_err(|e| DetectError::Contract(e.to_string()))?;
        // Drop the semantic layer, keep acoustic layers 1..=7.
        Ok(TokenSet::new(layers.slice(s![1.., .., ..]).to_owned()))
    }
}
