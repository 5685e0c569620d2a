//! Verdict entities

use serde::{Deserialize, Serialize};

// ==================== Factor labels ====================
// Human-readable trip labels surfaced to the table. Localization happens in
// the presentation layer; these are the canonical keys.

pub const FACTOR_MORE_BLINKING: &str = "more blinking";
pub const FACTOR_LESS_BLINKING: &str = "less blinking";
pub const FACTOR_LONGER_RESPONSE: &str = "longer response";
pub const FACTOR_FASTER_RESPONSE: &str = "faster response";
pub const FACTOR_HEAD_MOVEMENT: &str = "head movement";
pub const FACTOR_FACIAL_TENSION: &str = "facial tension";
pub const FACTOR_LONG_PAUSE: &str = "long pause";
pub const FACTOR_NORMAL_PATTERN: &str = "normal pattern";
pub const FACTOR_NO_CALIBRATION: &str = "no calibration";

/// The verdict engine's output for one gameplay response (Value Object)
///
/// `confidence` is the suspicion score in [0, 1]; `factors` lists the
/// tripped signals in evaluation order and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionVerdict {
    pub confidence: f64,
    pub is_suspicious: bool,
    pub factors: Vec<String>,
}

impl QuestionVerdict {
    /// Assemble a verdict from a raw weight sum and the tripped labels.
    ///
    /// Clamps confidence to [0, 1] and substitutes the default label when
    /// nothing tripped.
    pub fn from_factors(weight_sum: f64, factors: Vec<String>) -> Self {
        let confidence = weight_sum.clamp(0.0, 1.0);
        let factors = if factors.is_empty() {
            vec![FACTOR_NORMAL_PATTERN.to_string()]
        } else {
            factors
        };
        Self {
            confidence,
            is_suspicious: confidence > 0.5,
            factors,
        }
    }

    /// The deliberate neutral verdict for an uncalibrated player.
    pub fn no_calibration() -> Self {
        Self {
            confidence: 0.5,
            is_suspicious: false,
            factors: vec![FACTOR_NO_CALIBRATION.to_string()],
        }
    }
}
