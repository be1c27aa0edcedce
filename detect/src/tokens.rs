use ndarray::Array3;

use crate::ACOUSTIC_LAYERS;

/// The acoustic token layers for one request.
///
/// Shape `[7, T, D]`: codebook layers 1..=7 of the tokenizer output,
/// in order. Layer 0 (semantic) is already discarded. Ephemeral, one
/// per request.
#[derive(Debug, Clone)]
pub struct TokenSet {
    layers: Array3<f32>,
}

impl TokenSet {
    pub(crate) fn new(layers: Array3<f32>) -> Self {
        debug_assert_eq!(layers.shape()[0], ACOUSTIC_LAYERS);
        Self { layers }
    }

    /// All acoustic layers, shape `[7, T, D]`.
    pub fn layers(&self) -> &Array3<f32> {
        &self.layers
    }

    /// Number of token frames per layer.
    pub fn frames(&self) -> usize {
        self.layers.shape()[1]
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.layers.shape()[2]
    }
}
