//! Baseline entities

use crate::core::answer::SpokenAnswer;
use crate::response::QuestionResponse;
use crate::stats::SignalStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Intensity distribution of one tracked facial action over a pooled
/// sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeStats {
    pub mean: f32,
    pub std_dev: f32,
    pub max: f32,
}

/// Statistical reference of a player's truthful answering behavior for one
/// answer polarity (Entity)
///
/// Built once per polarity at calibration completion. Signals with too few
/// observations fall back to documented conservative defaults so the
/// verdict engine always has a well-defined comparison point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacialBaseline {
    /// Blinks per second while answering truthfully
    pub blink_rate: SignalStats,
    /// Gaze/head stability in [0, 1]
    pub gaze_stability: SignalStats,
    /// Response duration in seconds
    pub response_duration: SignalStats,
    /// Intensity distributions for the tracked facial actions; an action is
    /// omitted when no pooled sample carried it
    pub blendshapes: BTreeMap<String, BlendshapeStats>,
}

/// A player's complete calibration output (Entity)
///
/// Wholly replaced on recalibration, never merged. Handed to the external
/// store at calibration completion; the core never persists it itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    /// Baseline for truthful "yes" answers
    pub truthful_yes: FacialBaseline,
    /// Baseline for truthful "no" answers
    pub truthful_no: FacialBaseline,
    /// Number of accepted calibration responses
    pub sample_count: usize,
    /// Mean fraction of expected frames actually captured, in [0, 1].
    /// A data-quality signal, not a scoring input.
    pub average_face_confidence: f64,
    /// RFC3339 creation timestamp, stamped at the persistence boundary
    pub created_at: String,
}

impl CalibrationData {
    /// Baseline matching a spoken answer's polarity.
    pub fn baseline_for(&self, answer: SpokenAnswer) -> &FacialBaseline {
        match answer {
            SpokenAnswer::Yes => &self.truthful_yes,
            SpokenAnswer::No => &self.truthful_no,
        }
    }

    /// Build calibration data from the full accepted response set.
    ///
    /// Responses are partitioned by answer polarity; each partition feeds
    /// one baseline. Callers must have filtered rejected responses out
    /// already: a mismatched calibration answer never reaches this point.
    pub fn from_responses(
        responses: &[QuestionResponse],
        nominal_sample_rate_hz: f64,
        created_at: impl Into<String>,
    ) -> Self {
        let yes: Vec<&QuestionResponse> = responses
            .iter()
            .filter(|r| r.answer == SpokenAnswer::Yes)
            .collect();
        let no: Vec<&QuestionResponse> = responses
            .iter()
            .filter(|r| r.answer == SpokenAnswer::No)
            .collect();

        Self {
            truthful_yes: super::builder::build_baseline(&yes),
            truthful_no: super::builder::build_baseline(&no),
            sample_count: responses.len(),
            average_face_confidence: super::builder::average_face_confidence(
                responses,
                nominal_sample_rate_hz,
            ),
            created_at: created_at.into(),
        }
    }
}
