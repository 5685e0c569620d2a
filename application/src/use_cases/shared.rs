//! Shared utilities for use cases.
//!
//! The calibration and game-session flows drive the capture orchestrator
//! with the same retry policy: timeouts, recognition failures, and rejected
//! calibration answers replay the question up to the configured attempt
//! limit, and nothing from an abandoned attempt survives into the next.

use crate::ports::progress::SessionProgress;
use crate::use_cases::capture_response::{
    CaptureError, CaptureOutcome, ResponseCapture,
};
use crate::ports::face_source::FaceSampleSource;
use crate::ports::speech_source::SpeechAnswerSource;
use bluff_domain::{Question, QuestionResponse};
use tracing::warn;

/// Counters for the non-resolving outcomes seen while driving one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureTally {
    pub rejected: usize,
    pub timed_out: usize,
    pub failed: usize,
}

/// How a question's capture loop ended.
pub(crate) enum RetryOutcome {
    /// A response resolved within the attempt limit
    Resolved(QuestionResponse),
    /// The player cancelled from outside
    Cancelled,
    /// The attempt limit was reached without a resolution
    Exhausted { attempts: u32 },
}

/// Capture one question, replaying on retryable outcomes.
///
/// `Err` is reserved for caller misuse and gating (`InvalidPhase`,
/// `FaceNotReady`); every expected condition maps to a [`RetryOutcome`].
pub(crate) async fn capture_with_retries<F, S>(
    capture: &mut ResponseCapture<F, S>,
    question: &Question,
    progress: &dyn SessionProgress,
    tally: &mut CaptureTally,
) -> Result<RetryOutcome, CaptureError>
where
    F: FaceSampleSource,
    S: SpeechAnswerSource,
{
    let max_attempts = capture.params().max_attempts_per_question;
    let mut attempts = 0;

    while attempts < max_attempts {
        attempts += 1;
        let begin = if attempts == 1 {
            capture.begin_capture(question.clone()).await
        } else {
            capture.retry().await
        };
        match begin {
            Ok(()) => {}
            Err(CaptureError::Cancelled) => return Ok(RetryOutcome::Cancelled),
            Err(e) => return Err(e),
        }

        match capture.start_answering().await? {
            CaptureOutcome::Resolved(response) => return Ok(RetryOutcome::Resolved(response)),
            CaptureOutcome::Cancelled => return Ok(RetryOutcome::Cancelled),
            CaptureOutcome::TimedOut => {
                tally.timed_out += 1;
                warn!("Attempt {}/{} timed out", attempts, max_attempts);
                progress.on_question_retry("timeout");
            }
            CaptureOutcome::Failed(message) => {
                tally.failed += 1;
                warn!(
                    "Attempt {}/{} failed: {}",
                    attempts, max_attempts, message
                );
                progress.on_question_retry(&message);
            }
            CaptureOutcome::Rejected { answer } => {
                tally.rejected += 1;
                warn!(
                    "Attempt {}/{} rejected: answered {}",
                    attempts, max_attempts, answer
                );
                progress.on_question_retry("wrong calibration answer");
            }
        }
    }

    Ok(RetryOutcome::Exhausted {
        attempts: max_attempts,
    })
}
