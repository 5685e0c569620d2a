//! Capture feedback port
//!
//! Audio, haptic, and screen collaborators get notified on capture state
//! transitions. They are side-effecting services entirely outside the
//! core; the orchestrator never depends on their behavior.

use crate::use_cases::capture_response::CapturePhase;
use bluff_domain::SpokenAnswer;

/// Callback for capture state transitions.
///
/// All methods default to no-ops so implementations subscribe only to what
/// they render.
pub trait CaptureFeedback: Send + Sync {
    /// Called on every phase transition.
    fn on_phase(&self, _phase: &CapturePhase) {}

    /// Called when a spoken answer resolves, before the outcome is
    /// classified.
    fn on_answer(&self, _answer: &SpokenAnswer) {}
}

/// No-op feedback for tests and headless runs.
pub struct NoFeedback;

impl CaptureFeedback for NoFeedback {}
