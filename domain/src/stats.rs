//! Scalar statistics helpers
//!
//! Baselines describe a player with (mean, population standard deviation)
//! pairs. Population rather than sample deviation: the calibration answers
//! are the whole population being described, not a sample of a larger one.

use serde::{Deserialize, Serialize};

/// Mean of a value set, 0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 when empty.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// A (mean, standard deviation) summary of one scalar signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl SignalStats {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Summarize a value set, falling back to the given mean when empty.
    ///
    /// The fallback keeps the verdict engine's comparison point well
    /// defined for players with too few calibration answers of one
    /// polarity.
    pub fn from_values_or(values: &[f64], default_mean: f64) -> Self {
        if values.is_empty() {
            return Self::new(default_mean, 0.0);
        }
        Self::new(mean(values), std_dev(values))
    }

    /// Absolute deviation of an observation from the mean.
    pub fn deviation(&self, value: f64) -> f64 {
        (value - self.mean).abs()
    }
}
