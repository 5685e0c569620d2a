//! Baseline builder
//!
//! Pure aggregation turning one polarity's calibration responses into a
//! [`FacialBaseline`]. Called twice per calibration, once per spoken-answer
//! polarity.

use crate::baseline::entities::{BlendshapeStats, FacialBaseline};
use crate::face::blendshapes::TRACKED_BLENDSHAPES;
use crate::face::metrics;
use crate::face::sample::FaceSample;
use crate::response::QuestionResponse;
use crate::stats::{self, SignalStats};
use std::collections::BTreeMap;

/// Fallback blink-rate mean for an empty response set (blinks/second).
pub const DEFAULT_BLINK_RATE_MEAN: f64 = 0.5;
/// Fallback gaze-stability mean for an empty response set.
pub const DEFAULT_GAZE_STABILITY_MEAN: f64 = 0.5;
/// Fallback response-duration mean for an empty response set (seconds).
pub const DEFAULT_DURATION_MEAN: f64 = 2.0;

/// Build a baseline from one polarity's accepted responses.
///
/// An empty set yields the documented conservative defaults (blink 0.5,
/// gaze 0.5, duration 2.0 s, all standard deviations 0, no blendshape
/// entries) rather than an error, so players with too few answers of one
/// polarity still score against something well defined.
pub fn build_baseline(responses: &[&QuestionResponse]) -> FacialBaseline {
    let blink_rates: Vec<f64> = responses
        .iter()
        .map(|r| metrics::blink_rate(&r.samples))
        .collect();
    let stabilities: Vec<f64> = responses
        .iter()
        .map(|r| metrics::gaze_stability(&r.samples))
        .collect();
    let durations: Vec<f64> = responses.iter().map(|r| r.duration_secs()).collect();

    let pooled: Vec<&FaceSample> = responses.iter().flat_map(|r| r.samples.iter()).collect();

    FacialBaseline {
        blink_rate: SignalStats::from_values_or(&blink_rates, DEFAULT_BLINK_RATE_MEAN),
        gaze_stability: SignalStats::from_values_or(&stabilities, DEFAULT_GAZE_STABILITY_MEAN),
        response_duration: SignalStats::from_values_or(&durations, DEFAULT_DURATION_MEAN),
        blendshapes: blendshape_stats(&pooled),
    }
}

/// Mean fraction of expected frames actually captured, over the full
/// accepted response set.
///
/// Expected frames per response are its duration times the nominal sensor
/// rate. A response that captured more than expected clamps to 1; the
/// signal flags dropouts, not surpluses. An empty set (or a zero-length
/// response window) reports 1.0: no evidence of capture problems.
pub fn average_face_confidence(responses: &[QuestionResponse], nominal_sample_rate_hz: f64) -> f64 {
    if responses.is_empty() {
        return 1.0;
    }
    let total: f64 = responses
        .iter()
        .map(|r| {
            let expected = r.duration_secs() * nominal_sample_rate_hz;
            if expected <= 0.0 {
                return 1.0;
            }
            (r.samples.len() as f64 / expected).min(1.0)
        })
        .sum();
    total / responses.len() as f64
}

/// Pool all samples and summarize each tracked facial action.
///
/// An action no pooled sample carries is omitted entirely.
fn blendshape_stats(pooled: &[&FaceSample]) -> BTreeMap<String, BlendshapeStats> {
    let mut out = BTreeMap::new();
    for name in TRACKED_BLENDSHAPES {
        let values: Vec<f64> = pooled
            .iter()
            .filter_map(|s| s.feature(name).map(f64::from))
            .collect();
        if values.is_empty() {
            continue;
        }
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        out.insert(
            name.to_string(),
            BlendshapeStats {
                mean: stats::mean(&values) as f32,
                std_dev: stats::std_dev(&values) as f32,
                max: max as f32,
            },
        );
    }
    out
}
