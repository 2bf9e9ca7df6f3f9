//! Confidence Policy
//!
//! Decides when a prediction is shaky enough to warn the user.
//! The warning never changes the selected label.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOW_CONFIDENCE;

pub const LOW_CONFIDENCE_WARNING: &str = "⚠️ Low confidence. Try a clearer image or better lighting.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    /// Confidence below this value is flagged (0.0 - 1.0)
    pub low_confidence_threshold: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE,
        }
    }
}

impl ConfidencePolicy {
    pub fn new(threshold: f32) -> Self {
        Self {
            low_confidence_threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn is_low(&self, confidence: f32) -> bool {
        confidence < self.low_confidence_threshold
    }

    /// Warning to append to the result message, if any
    pub fn warning(&self, confidence: f32) -> Option<&'static str> {
        self.is_low(confidence).then_some(LOW_CONFIDENCE_WARNING)
    }
}
