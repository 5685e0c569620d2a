//! Run Calibration use case
//!
//! Drives the truth-only calibration flow: captures one response per
//! calibration question, rejecting answers that contradict the expected
//! truth, then reduces the accepted set to a [`CalibrationData`] and hands
//! it across the persistence boundary.

use crate::config::capture_params::CaptureParams;
use crate::ports::calibration_store::{CalibrationStore, StoreError};
use crate::ports::capture_feedback::CaptureFeedback;
use crate::ports::face_source::FaceSampleSource;
use crate::ports::progress::SessionProgress;
use crate::ports::session_logger::{SessionEvent, SessionLogger};
use crate::ports::speech_source::SpeechAnswerSource;
use crate::use_cases::capture_response::{CaptureError, ResponseCapture};
use crate::use_cases::shared::{self, CaptureTally, RetryOutcome};
use bluff_domain::{CalibrationData, PlayerId, Question, QuestionResponse};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur during calibration
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("No calibration questions provided")]
    NoQuestions,

    #[error("Question {0} has no expected truthful answer")]
    MissingExpectedAnswer(usize),

    #[error("Question {index} still unresolved after {attempts} attempts")]
    AttemptsExhausted { index: usize, attempts: u32 },

    #[error("Calibration cancelled")]
    Cancelled,

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunCalibration use case
#[derive(Debug, Clone)]
pub struct CalibrationInput {
    /// The player being calibrated
    pub player: PlayerId,
    /// Calibration questions, each with a known truthful answer
    pub questions: Vec<Question>,
    /// RFC3339 timestamp stamped on the calibration output. Supplied by
    /// the caller so the domain stays clock-free.
    pub created_at: String,
}

impl CalibrationInput {
    pub fn new(
        player: PlayerId,
        questions: Vec<Question>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            player,
            questions,
            created_at: created_at.into(),
        }
    }
}

/// What a completed calibration looked like.
#[derive(Debug, Clone)]
pub struct CalibrationReport {
    /// The stored calibration output
    pub data: CalibrationData,
    /// Responses accepted into the baselines
    pub accepted: usize,
    /// Attempts rejected for a wrong calibration answer
    pub rejected: usize,
    /// Attempts lost to the answer timeout
    pub timed_out: usize,
    /// Attempts lost to recognition errors
    pub failed: usize,
}

/// Use case for running the truth-only calibration phase
pub struct RunCalibrationUseCase<F, S> {
    capture: ResponseCapture<F, S>,
    store: Arc<dyn CalibrationStore>,
}

impl<F, S> RunCalibrationUseCase<F, S>
where
    F: FaceSampleSource,
    S: SpeechAnswerSource,
{
    pub fn new(
        face: Arc<F>,
        speech: Arc<S>,
        store: Arc<dyn CalibrationStore>,
        params: CaptureParams,
    ) -> Self {
        Self {
            capture: ResponseCapture::new(face, speech, params),
            store,
        }
    }

    /// Attach an audio/haptic/UI feedback collaborator to the capture
    /// state machine.
    pub fn with_feedback(mut self, feedback: Arc<dyn CaptureFeedback>) -> Self {
        self.capture = self.capture.with_feedback(feedback);
        self
    }

    /// Token outside collaborators can use to abort the calibration.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.capture.cancel_handle()
    }

    /// Execute the calibration flow.
    pub async fn execute(
        &mut self,
        input: CalibrationInput,
        progress: &dyn SessionProgress,
        logger: &dyn SessionLogger,
    ) -> Result<CalibrationReport, CalibrationError> {
        if input.questions.is_empty() {
            return Err(CalibrationError::NoQuestions);
        }
        for (index, question) in input.questions.iter().enumerate() {
            if question.expected_answer().is_none() {
                return Err(CalibrationError::MissingExpectedAnswer(index));
            }
        }

        info!(
            "Starting calibration for {} with {} questions",
            input.player,
            input.questions.len()
        );

        let total = input.questions.len();
        let mut accepted: Vec<QuestionResponse> = Vec::with_capacity(total);
        let mut tally = CaptureTally::default();

        for (index, question) in input.questions.iter().enumerate() {
            progress.on_question_start(index, total);
            match shared::capture_with_retries(&mut self.capture, question, progress, &mut tally)
                .await?
            {
                RetryOutcome::Resolved(response) => {
                    logger.log(SessionEvent::new(
                        "calibration_response",
                        json!({
                            "player": input.player.as_str(),
                            "question": question.prompt(),
                            "answer": response.answer.as_str(),
                            "samples": response.samples.len(),
                            "duration_secs": response.duration_secs(),
                        }),
                    ));
                    accepted.push(response);
                }
                RetryOutcome::Cancelled => return Err(CalibrationError::Cancelled),
                RetryOutcome::Exhausted { attempts } => {
                    return Err(CalibrationError::AttemptsExhausted { index, attempts });
                }
            }
        }

        debug!(
            "Calibration captured {} responses ({} rejected, {} timed out, {} failed)",
            accepted.len(),
            tally.rejected,
            tally.timed_out,
            tally.failed
        );

        // Only accepted responses reach the baseline builder; rejected
        // attempts were discarded at capture time.
        let data = CalibrationData::from_responses(
            &accepted,
            self.capture.params().nominal_sample_rate_hz,
            input.created_at.clone(),
        );

        self.store.save(&input.player, &data).await?;
        info!(
            "Stored calibration for {} (sample count {}, face confidence {:.2})",
            input.player, data.sample_count, data.average_face_confidence
        );

        progress.on_calibration_complete(&data);
        logger.log(SessionEvent::new(
            "calibration_complete",
            json!({
                "player": input.player.as_str(),
                "sample_count": data.sample_count,
                "average_face_confidence": data.average_face_confidence,
                "created_at": data.created_at,
            }),
        ));

        Ok(CalibrationReport {
            data,
            accepted: accepted.len(),
            rejected: tally.rejected,
            timed_out: tally.timed_out,
            failed: tally.failed,
        })
    }
}
