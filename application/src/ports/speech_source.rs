//! Speech answer source port
//!
//! Defines the interface to the yes/no speech recognizer.

use async_trait::async_trait;
use bluff_domain::SpokenAnswer;
use std::time::Duration;

/// Resolution of one listen window.
///
/// All recognizer conditions are variants, not errors: timeouts and
/// recognition failures are expected, retryable outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// A yes/no answer was recognized
    Answer(SpokenAnswer),
    /// Nothing intelligible arrived within the window
    Timeout,
    /// The recognizer failed (engine unavailable, audio session lost, ...)
    Error(String),
}

/// A one-shot asynchronous yes/no recognizer.
///
/// At most one listen is outstanding per orchestrator; the orchestrator
/// cancels the previous listen before starting the next attempt.
#[async_trait]
pub trait SpeechAnswerSource: Send + Sync {
    /// Listen for a yes/no answer, resolving within roughly `timeout`.
    ///
    /// The orchestrator races an independent timer against this call, so a
    /// source that never resolves still cannot hang an attempt.
    async fn listen(&self, timeout: Duration) -> SpeechOutcome;

    /// Cancel any in-flight listen. Idempotent; a cancelled listen's late
    /// completion must be swallowed by the implementation.
    fn cancel(&self);
}
