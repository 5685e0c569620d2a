//! Per-response facial motion metrics
//!
//! Pure functions reducing an ordered sample sequence to the scalar signals
//! the baseline builder and verdict engine consume.

use crate::face::sample::FaceSample;

/// Threshold an averaged blink coefficient must rise above to count as a
/// blink.
const BLINK_THRESHOLD: f32 = 0.5;

/// Count blinks in an ordered sample sequence.
///
/// A blink is a rising edge: the averaged eye-blink coefficient crosses
/// above the threshold having previously been at or below it. Frames held
/// above the threshold do not count again until the coefficient falls back.
pub fn blink_count(samples: &[FaceSample]) -> usize {
    let mut count = 0;
    let mut above = false;
    for sample in samples {
        let blinking = sample.avg_blink() > BLINK_THRESHOLD;
        if blinking && !above {
            count += 1;
        }
        above = blinking;
    }
    count
}

/// Blinks per second over the recorded span, 0 when the span is empty.
pub fn blink_rate(samples: &[FaceSample]) -> f64 {
    let Some(last) = samples.last() else {
        return 0.0;
    };
    if last.timestamp <= 0.0 {
        return 0.0;
    }
    blink_count(samples) as f64 / last.timestamp
}

/// Mean frame-to-frame rotation delta: `|Δpitch| + |Δyaw|` averaged over
/// consecutive sample pairs. 0 when fewer than 2 samples exist.
///
/// Roll is excluded; the signal tracks where the player is looking, and
/// head tilt barely moves the gaze.
pub fn mean_rotation_delta(samples: &[FaceSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let total: f64 = samples
        .windows(2)
        .map(|pair| {
            let delta_pitch = (pair[1].rotation.pitch - pair[0].rotation.pitch).abs();
            let delta_yaw = (pair[1].rotation.yaw - pair[0].rotation.yaw).abs();
            (delta_pitch + delta_yaw) as f64
        })
        .sum();
    total / (samples.len() - 1) as f64
}

/// Gaze/head stability in [0, 1]: 1 is a perfectly still head.
///
/// Defined as 0.5 when fewer than 2 samples exist, so a degenerate capture
/// neither looks perfectly calm nor perfectly restless.
pub fn gaze_stability(samples: &[FaceSample]) -> f64 {
    if samples.len() < 2 {
        return 0.5;
    }
    (1.0 - 2.0 * mean_rotation_delta(samples)).clamp(0.0, 1.0)
}

/// Mean intensity of one named blendshape across the samples that carry it.
///
/// `None` when no sample carries the coefficient.
pub fn mean_intensity(samples: &[FaceSample], name: &str) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.feature(name).map(f64::from))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
