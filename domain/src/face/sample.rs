//! Facial feature frames

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Head orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadRotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl HeadRotation {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// One timestamped facial feature frame (Value Object)
///
/// `timestamp` is seconds since recording start; within a response the
/// sequence starts at 0 and is non-decreasing. `features` maps blendshape
/// names to intensities in [0, 1]. A sample is immutable once recorded and
/// owned exclusively by the response that captured it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    pub timestamp: f64,
    pub features: BTreeMap<String, f32>,
    pub rotation: HeadRotation,
}

impl FaceSample {
    pub fn new(
        timestamp: f64,
        features: BTreeMap<String, f32>,
        rotation: HeadRotation,
    ) -> Self {
        Self {
            timestamp,
            features,
            rotation,
        }
    }

    /// Intensity of one named blendshape, if the frame carries it.
    pub fn feature(&self, name: &str) -> Option<f32> {
        self.features.get(name).copied()
    }

    /// Mean of the left/right eye-blink coefficients, treating a missing
    /// coefficient as 0.
    pub fn avg_blink(&self) -> f32 {
        let left = self.feature(super::blendshapes::EYE_BLINK_LEFT).unwrap_or(0.0);
        let right = self.feature(super::blendshapes::EYE_BLINK_RIGHT).unwrap_or(0.0);
        (left + right) / 2.0
    }
}
