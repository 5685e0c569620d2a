//! Captured question responses

use crate::core::answer::SpokenAnswer;
use crate::core::question::Question;
use crate::face::sample::FaceSample;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One atomic capture record (Entity)
///
/// Assembled by the capture orchestrator when a spoken answer resolves
/// inside the response window. Never mutated afterward; the samples are
/// owned exclusively by this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// The question that was asked
    pub question: Question,
    /// The resolved spoken answer
    pub answer: SpokenAnswer,
    /// Ordered facial feature frames captured during the answer window
    pub samples: Vec<FaceSample>,
    /// Wall-clock time from recording start to answer resolution
    pub response_duration: Duration,
}

impl QuestionResponse {
    /// Assemble a response record.
    ///
    /// Sample timestamps must start at 0 and be non-decreasing; the capture
    /// sources guarantee this by stamping frames relative to recording
    /// start, and debug builds verify it.
    pub fn new(
        question: Question,
        answer: SpokenAnswer,
        samples: Vec<FaceSample>,
        response_duration: Duration,
    ) -> Self {
        debug_assert!(
            samples.windows(2).all(|p| p[0].timestamp <= p[1].timestamp),
            "sample timestamps must be non-decreasing"
        );
        debug_assert!(
            samples.first().is_none_or(|s| s.timestamp >= 0.0),
            "sample timestamps must start at or after 0"
        );
        Self {
            question,
            answer,
            samples,
            response_duration,
        }
    }

    /// Response duration in fractional seconds, the unit the statistics use.
    pub fn duration_secs(&self) -> f64 {
        self.response_duration.as_secs_f64()
    }
}
