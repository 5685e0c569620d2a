//! Verdict engine
//!
//! Pure scoring of one gameplay response against the player's matching
//! truthful baseline. Five independent all-or-nothing factors contribute
//! additive weights; the clamped sum is the suspicion score.
//!
//! The model is an intentionally simple deterministic weighting for a party
//! game, not a validated lie detector.

use crate::baseline::entities::CalibrationData;
use crate::face::blendshapes::BROW_INNER_UP;
use crate::face::metrics;
use crate::response::QuestionResponse;
use crate::verdict::entities::{
    FACTOR_FACIAL_TENSION, FACTOR_FASTER_RESPONSE, FACTOR_HEAD_MOVEMENT, FACTOR_LESS_BLINKING,
    FACTOR_LONG_PAUSE, FACTOR_LONGER_RESPONSE, FACTOR_MORE_BLINKING, QuestionVerdict,
};
use serde::{Deserialize, Serialize};

// Factor weights. Fixed by the scoring model; tuning happens through the
// thresholds in ScoringParams instead.
const WEIGHT_BLINK: f64 = 0.30;
const WEIGHT_DURATION: f64 = 0.25;
const WEIGHT_HEAD_MOVEMENT: f64 = 0.20;
const WEIGHT_BROW_TENSION: f64 = 0.15;
const WEIGHT_EXTREME_PAUSE: f64 = 0.10;

/// Tunable scoring thresholds.
///
/// The head-movement and brow-tension cutoffs are empirically chosen
/// constants with no stated derivation, so they stay configurable rather
/// than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Deviation multiplier for the blink-rate factor
    pub blink_sigma: f64,
    /// Deviation multiplier for the response-duration factor
    pub duration_sigma: f64,
    /// Fixed cutoff for the mean frame-to-frame rotation delta
    pub head_movement_threshold: f64,
    /// Fixed cutoff for the mean inner-brow-raise intensity
    pub brow_tension_threshold: f64,
    /// Deviation multiplier for the extreme-pause factor
    pub extreme_pause_sigma: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            blink_sigma: 2.0,
            duration_sigma: 2.0,
            head_movement_threshold: 0.3,
            brow_tension_threshold: 0.5,
            extreme_pause_sigma: 3.0,
        }
    }
}

/// Score one response against a player's calibration.
///
/// A player with no calibration gets the defined neutral verdict
/// (confidence 0.5, not suspicious) rather than an error. Otherwise the
/// baseline matching the response's answer polarity is selected and the
/// five factors are evaluated in order.
pub fn score(
    response: &QuestionResponse,
    calibration: Option<&CalibrationData>,
    params: &ScoringParams,
) -> QuestionVerdict {
    let Some(calibration) = calibration else {
        return QuestionVerdict::no_calibration();
    };

    let baseline = calibration.baseline_for(response.answer);
    let mut weight_sum = 0.0;
    let mut factors = Vec::new();

    // 1. Blink-rate deviation
    let rate = metrics::blink_rate(&response.samples);
    let blink = &baseline.blink_rate;
    if blink.deviation(rate) > params.blink_sigma * blink.std_dev {
        weight_sum += WEIGHT_BLINK;
        factors.push(
            if rate > blink.mean {
                FACTOR_MORE_BLINKING
            } else {
                FACTOR_LESS_BLINKING
            }
            .to_string(),
        );
    }

    // 2. Response-duration deviation
    let duration = response.duration_secs();
    let dur = &baseline.response_duration;
    if dur.deviation(duration) > params.duration_sigma * dur.std_dev {
        weight_sum += WEIGHT_DURATION;
        factors.push(
            if duration > dur.mean {
                FACTOR_LONGER_RESPONSE
            } else {
                FACTOR_FASTER_RESPONSE
            }
            .to_string(),
        );
    }

    // 3. Head movement against the fixed cutoff
    if metrics::mean_rotation_delta(&response.samples) > params.head_movement_threshold {
        weight_sum += WEIGHT_HEAD_MOVEMENT;
        factors.push(FACTOR_HEAD_MOVEMENT.to_string());
    }

    // 4. Brow tension against the fixed cutoff
    if let Some(brow) = metrics::mean_intensity(&response.samples, BROW_INNER_UP)
        && brow > params.brow_tension_threshold
    {
        weight_sum += WEIGHT_BROW_TENSION;
        factors.push(FACTOR_FACIAL_TENSION.to_string());
    }

    // 5. Extreme pause, far beyond the duration baseline
    if duration > dur.mean + params.extreme_pause_sigma * dur.std_dev {
        weight_sum += WEIGHT_EXTREME_PAUSE;
        factors.push(FACTOR_LONG_PAUSE.to_string());
    }

    QuestionVerdict::from_factors(weight_sum, factors)
}
