//! Logits -> probabilities -> verdict. Pure and deterministic.

use serde::Serialize;

/// Label rendered when the clip is judged synthetic.
pub const LABEL_FAKE: &str = "AI-generated (fake)";

/// Label rendered when the clip is judged human.
pub const LABEL_REAL: &str = "Human voice (real)";

/// Verdict for one detection call.
///
/// Invariants: `fake_probability + real_probability == 1` (softmax),
/// `confidence == max(fake_probability, real_probability)` in
/// `[0.5, 1.0]`, and `is_fake` iff `fake_probability` strictly exceeds
/// `real_probability`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub is_fake: bool,
    pub confidence: f64,
    pub fake_probability: f64,
    pub real_probability: f64,
    pub label: &'static str,
}

impl DetectionResult {
    /// Short verdict string used in API payloads.
    pub fn verdict(&self) -> &'static str {
        if self.is_fake { "fake" } else { "real" }
    }
}

/// Softmaxes the (real, fake) logit pair and picks the winning class.
///
/// A tie yields `is_fake == false`.
pub fn score(logits: [f32; 2]) -> DetectionResult {
    let real = logits[0] as f64;
    let fake = logits[1] as f64;

    // Stable two-class softmax.
    let m = real.max(fake);
    let er = (real - m).exp();
    let ef = (fake - m).exp();
    let real_probability = er / (er + ef);
    let fake_probability = ef / (er + ef);

    let is_fake = fake_probability > real_probability;
    DetectionResult {
        is_fake,
        confidence: real_probability.max(fake_probability),
        fake_probability,
        real_probability,
        label: if is_fake { LABEL_FAKE } else { LABEL_REAL },
    }
}
