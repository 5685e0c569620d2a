//! Session progress port
//!
//! Question-level callbacks for the presentation layer while a calibration
//! or game session runs.

use bluff_domain::{CalibrationData, QuestionVerdict};

/// Callback for per-question progress during a session.
pub trait SessionProgress: Send + Sync {
    /// Called before each question's capture begins.
    fn on_question_start(&self, _index: usize, _total: usize) {}

    /// Called when a question is replayed (timeout, recognition failure,
    /// or a rejected calibration answer).
    fn on_question_retry(&self, _reason: &str) {}

    /// Called with each gameplay verdict as it is scored.
    fn on_verdict(&self, _verdict: &QuestionVerdict) {}

    /// Called once when calibration completes successfully.
    fn on_calibration_complete(&self, _data: &CalibrationData) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SessionProgress for NoProgress {}
