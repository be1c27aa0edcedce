use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;

use crate::session::build_session;
use crate::{DetectError, TokenSet};

/// Pretrained transformer-student classifier head.
///
/// Opaque artifact. Contract:
///
/// - input: `[7, T, D]` f32 acoustic token layers
/// - output: 2 logits ordered (real, fake)
///
/// The (real, fake) ordering is relied on by [`crate::score`].
pub struct Classifier {
    session: Mutex<Session>,
}

impl Classifier {
    /// Loads classifier weights. Fatal on missing/corrupt checkpoint.
    pub fn load(path: &Path, use_cuda: bool) -> Result<Self, DetectError> {
        Ok(Self {
            session: build_session(path, "classifier", use_cuda)?,
        })
    }

    /// Scores one token set. Shape disagreement between the tokens and
    /// the model indicates weight/config version skew and is an error.
    pub fn classify(&self, tokens: &TokenSet) -> Result<[f32; 2], DetectError> {
        let tensor = Tensor::from_array(tokens.layers().clone())?;

        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![tensor])?;

        let output: ndarray::ArrayViewD<f32> = outputs[0].try_extract_array()?;
        // Accept [2] or [1, 2]; anything else is a contract violation.
        let logits: Vec<f32> = output.iter().copied().collect();
        if logits.len() != 2 {
            return Err(DetectError::Contract(format!(
                "classifier output shape {:?}, expected 2 logits",
                output.shape()
            )));
        }
        Ok([logits[0], logits[1]])
    }
}
