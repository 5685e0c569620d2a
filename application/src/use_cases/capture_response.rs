//! Response capture orchestrator
//!
//! A per-question state machine coordinating the two capture sources into
//! one atomic [`QuestionResponse`]. The orchestrator is logically
//! single-threaded: callers drive it through `&mut self` methods, while the
//! sources it starts run on their own threads and tasks. The
//! timeout-vs-recognition-vs-cancellation race is resolved exactly once per
//! attempt inside `start_answering`; losing futures are dropped and the
//! speech source is cancelled, so completions from a superseded attempt are
//! inert.

use crate::config::capture_params::CaptureParams;
use crate::ports::capture_feedback::{CaptureFeedback, NoFeedback};
use crate::ports::face_source::FaceSampleSource;
use crate::ports::speech_source::{SpeechAnswerSource, SpeechOutcome};
use bluff_domain::{Question, QuestionResponse, SpokenAnswer};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capture state machine phases.
///
/// `Resolved` is the only phase that yields a response record; the other
/// terminal phases route back through `Countdown` on retry or to `Idle` on
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Nothing in flight
    Idle,
    /// Fixed delay before the prompt is shown
    Countdown,
    /// Prompt visible, waiting for the participant to be ready
    ReadPrompt,
    /// Both sources live, racing answer against timeout
    Recording,
    /// A response record was produced
    Resolved,
    /// The answer window elapsed without an answer
    TimedOut,
    /// The recognizer reported an error
    Failed,
    /// Calibration only: the answer contradicted the expected truth
    Rejected,
}

impl CapturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapturePhase::Idle => "idle",
            CapturePhase::Countdown => "countdown",
            CapturePhase::ReadPrompt => "read_prompt",
            CapturePhase::Recording => "recording",
            CapturePhase::Resolved => "resolved",
            CapturePhase::TimedOut => "timed_out",
            CapturePhase::Failed => "failed",
            CapturePhase::Rejected => "rejected",
        }
    }

    /// Whether this phase ends an attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CapturePhase::Resolved
                | CapturePhase::TimedOut
                | CapturePhase::Failed
                | CapturePhase::Rejected
        )
    }

    /// Whether a retry of the same question is allowed from this phase.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CapturePhase::TimedOut | CapturePhase::Failed | CapturePhase::Rejected
        )
    }
}

impl std::fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution of one capture attempt.
///
/// Every recoverable condition is a variant, so callers are forced to
/// handle each case. Only `Resolved` carries a response record.
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// An answer arrived in time and (for calibration) matched expectations
    Resolved(QuestionResponse),
    /// The answer window elapsed; the attempt may be retried
    TimedOut,
    /// The recognizer failed; the attempt may be retried
    Failed(String),
    /// Calibration only: the resolved answer contradicted the expected
    /// truthful answer; the question is replayed and nothing is recorded
    Rejected {
        answer: SpokenAnswer,
    },
    /// The attempt was cancelled from outside
    Cancelled,
}

/// Caller misuse and gating errors.
///
/// Capture conditions (timeout, recognition failure, rejection,
/// cancellation mid-recording) are [`CaptureOutcome`] variants, not errors.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("{operation} is not allowed in phase {actual}")]
    InvalidPhase {
        operation: &'static str,
        actual: CapturePhase,
    },

    #[error("Face tracking is not ready")]
    FaceNotReady,

    #[error("Capture cancelled")]
    Cancelled,
}

/// The per-question capture orchestrator.
///
/// Owns the current phase, the pending question, and the cancellation
/// token outside collaborators use to abort an attempt (e.g. the player
/// navigating away). One orchestrator handles one participant at a time;
/// only one recording window is ever open.
pub struct ResponseCapture<F, S> {
    face: Arc<F>,
    speech: Arc<S>,
    feedback: Arc<dyn CaptureFeedback>,
    params: CaptureParams,
    phase: CapturePhase,
    question: Option<Question>,
    /// Attempt counter; bumped on every entry into `Recording` so logs and
    /// buffers can tell attempts apart.
    generation: u64,
    cancel: CancellationToken,
}

impl<F, S> ResponseCapture<F, S>
where
    F: FaceSampleSource,
    S: SpeechAnswerSource,
{
    pub fn new(face: Arc<F>, speech: Arc<S>, params: CaptureParams) -> Self {
        Self {
            face,
            speech,
            feedback: Arc::new(NoFeedback),
            params,
            phase: CapturePhase::Idle,
            question: None,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach an audio/haptic/UI feedback collaborator.
    pub fn with_feedback(mut self, feedback: Arc<dyn CaptureFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn params(&self) -> &CaptureParams {
        &self.params
    }

    /// Handle outside collaborators use to cancel the current attempt.
    ///
    /// The token is consumed by a cancellation: after an attempt observes
    /// it, the orchestrator installs a fresh token, so a new handle must be
    /// taken for the next attempt.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Begin capture for a question: `Idle → Countdown → ReadPrompt`.
    ///
    /// The countdown is display-only; no source is started. Allowed from
    /// `Idle` or any terminal phase (moving on to the next question).
    pub async fn begin_capture(&mut self, question: Question) -> Result<(), CaptureError> {
        if self.phase != CapturePhase::Idle && !self.phase.is_terminal() {
            return Err(CaptureError::InvalidPhase {
                operation: "begin_capture",
                actual: self.phase,
            });
        }
        debug!("Beginning capture for question: {}", question.prompt());
        self.question = Some(question);
        self.run_countdown().await
    }

    /// Replay the same question after a timeout, failure, or rejection.
    ///
    /// Resets nothing but the phase: the previous attempt already cleaned
    /// up its timer, recognition, and sample buffer on exit.
    pub async fn retry(&mut self) -> Result<(), CaptureError> {
        if !self.phase.is_retryable() {
            return Err(CaptureError::InvalidPhase {
                operation: "retry",
                actual: self.phase,
            });
        }
        debug!("Retrying question (generation {})", self.generation);
        self.run_countdown().await
    }

    /// Abort whatever is in flight and return to `Idle`.
    ///
    /// Safe to call in any phase, any number of times. No samples, audio,
    /// or partial responses survive into the next attempt.
    pub fn reset(&mut self) {
        self.cleanup();
        self.cancel = CancellationToken::new();
        self.question = None;
        self.set_phase(CapturePhase::Idle);
    }

    /// Start both sources and race answer, timeout, and cancellation:
    /// `ReadPrompt → Recording → {Resolved | TimedOut | Failed | Rejected}`.
    ///
    /// Refuses to record until the face source reports tracking quality is
    /// good. The race resolves exactly once; every exit path runs the same
    /// idempotent cleanup.
    pub async fn start_answering(&mut self) -> Result<CaptureOutcome, CaptureError> {
        if self.phase != CapturePhase::ReadPrompt {
            return Err(CaptureError::InvalidPhase {
                operation: "start_answering",
                actual: self.phase,
            });
        }
        let Some(question) = self.question.clone() else {
            // begin_capture always sets the question before ReadPrompt
            return Err(CaptureError::InvalidPhase {
                operation: "start_answering",
                actual: self.phase,
            });
        };
        if !self.face.is_ready() {
            return Err(CaptureError::FaceNotReady);
        }

        self.generation += 1;
        self.set_phase(CapturePhase::Recording);
        info!(
            "Recording answer (generation {}, timeout {:?})",
            self.generation, self.params.answer_timeout
        );

        let started = Instant::now();
        self.face.start();

        let timeout = self.params.answer_timeout;
        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Capture cancelled during recording");
                CaptureOutcome::Cancelled
            }
            _ = tokio::time::sleep(timeout) => {
                warn!("Answer window elapsed after {:?}", timeout);
                CaptureOutcome::TimedOut
            }
            resolution = self.speech.listen(timeout) => match resolution {
                SpeechOutcome::Answer(answer) => {
                    let duration = started.elapsed();
                    self.feedback.on_answer(&answer);
                    // exactly one draining stop per attempt
                    let samples = self.face.stop();
                    self.classify_answer(&question, answer, samples, duration)
                }
                SpeechOutcome::Timeout => {
                    warn!("Recognizer reported timeout");
                    CaptureOutcome::TimedOut
                }
                SpeechOutcome::Error(message) => {
                    warn!("Recognition error: {}", message);
                    CaptureOutcome::Failed(message)
                }
            },
        };

        // Same cleanup on every exit path: stop the face source (a no-op
        // after a draining stop), cancel any in-flight recognition.
        self.cleanup();

        match &outcome {
            CaptureOutcome::Resolved(_) => self.set_phase(CapturePhase::Resolved),
            CaptureOutcome::TimedOut => self.set_phase(CapturePhase::TimedOut),
            CaptureOutcome::Failed(_) => self.set_phase(CapturePhase::Failed),
            CaptureOutcome::Rejected { .. } => self.set_phase(CapturePhase::Rejected),
            CaptureOutcome::Cancelled => {
                self.cancel = CancellationToken::new();
                self.question = None;
                self.set_phase(CapturePhase::Idle);
            }
        }
        Ok(outcome)
    }

    fn classify_answer(
        &self,
        question: &Question,
        answer: SpokenAnswer,
        samples: Vec<bluff_domain::FaceSample>,
        duration: std::time::Duration,
    ) -> CaptureOutcome {
        if let Some(expected) = question.expected_answer()
            && answer != expected
        {
            // wrong calibration answer: replay the question, record nothing
            info!(
                "Rejected calibration answer {} (expected {})",
                answer, expected
            );
            return CaptureOutcome::Rejected { answer };
        }
        info!(
            "Resolved answer {} with {} samples in {:?}",
            answer,
            samples.len(),
            duration
        );
        CaptureOutcome::Resolved(QuestionResponse::new(
            question.clone(),
            answer,
            samples,
            duration,
        ))
    }

    async fn run_countdown(&mut self) -> Result<(), CaptureError> {
        self.set_phase(CapturePhase::Countdown);
        let cancel = self.cancel.clone();
        let cancelled = tokio::select! {
            _ = cancel.cancelled() => true,
            _ = tokio::time::sleep(self.params.countdown) => false,
        };
        if cancelled {
            self.cleanup();
            self.cancel = CancellationToken::new();
            self.question = None;
            self.set_phase(CapturePhase::Idle);
            return Err(CaptureError::Cancelled);
        }
        self.set_phase(CapturePhase::ReadPrompt);
        Ok(())
    }

    /// Release both sources. Idempotent: stop on a drained source returns
    /// empty, cancel on an idle recognizer is a no-op.
    fn cleanup(&self) {
        let _ = self.face.stop();
        self.speech.cancel();
    }

    fn set_phase(&mut self, phase: CapturePhase) {
        debug!("Capture phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.feedback.on_phase(&phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bluff_domain::{FaceSample, HeadRotation};
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct MockFaceSource {
        /// Sample batches handed out per draining stop, in order.
        batches: Mutex<VecDeque<Vec<FaceSample>>>,
        ready: AtomicBool,
        recording: AtomicBool,
        stops: AtomicUsize,
    }

    impl MockFaceSource {
        fn new(batches: Vec<Vec<FaceSample>>) -> Self {
            Self {
                batches: Mutex::new(VecDeque::from(batches)),
                ready: AtomicBool::new(true),
                recording: AtomicBool::new(false),
                stops: AtomicUsize::new(0),
            }
        }

        fn set_ready(&self, ready: bool) {
            self.ready.store(ready, Ordering::SeqCst);
        }
    }

    impl FaceSampleSource for MockFaceSource {
        fn start(&self) {
            self.recording.store(true, Ordering::SeqCst);
        }

        fn stop(&self) -> Vec<FaceSample> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if !self.recording.swap(false, Ordering::SeqCst) {
                return Vec::new();
            }
            self.batches.lock().unwrap().pop_front().unwrap_or_default()
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }

        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }
    }

    struct MockSpeechSource {
        outcomes: Mutex<VecDeque<(Duration, SpeechOutcome)>>,
        cancels: AtomicUsize,
    }

    impl MockSpeechSource {
        fn new(outcomes: Vec<(Duration, SpeechOutcome)>) -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::from(outcomes)),
                cancels: AtomicUsize::new(0),
            }
        }

        fn answering(answer: SpokenAnswer) -> Self {
            Self::new(vec![(
                Duration::from_millis(500),
                SpeechOutcome::Answer(answer),
            )])
        }
    }

    #[async_trait]
    impl SpeechAnswerSource for MockSpeechSource {
        async fn listen(&self, _timeout: Duration) -> SpeechOutcome {
            let next = self.outcomes.lock().unwrap().pop_front();
            match next {
                Some((delay, outcome)) => {
                    tokio::time::sleep(delay).await;
                    outcome
                }
                // nothing scripted: hang until the orchestrator's timer
                // or cancellation wins the race
                None => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample(t: f64) -> FaceSample {
        FaceSample::new(t, BTreeMap::new(), HeadRotation::default())
    }

    fn fast_params() -> CaptureParams {
        CaptureParams::default()
            .with_countdown(Duration::from_millis(10))
            .with_answer_timeout(Duration::from_secs(2))
    }

    fn capture(
        face: Arc<MockFaceSource>,
        speech: Arc<MockSpeechSource>,
    ) -> ResponseCapture<MockFaceSource, MockSpeechSource> {
        ResponseCapture::new(face, speech, fast_params())
    }

    // ==================== Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_resolves_response() {
        let face = Arc::new(MockFaceSource::new(vec![vec![sample(0.0), sample(0.4)]]));
        let speech = Arc::new(MockSpeechSource::answering(SpokenAnswer::Yes));
        let mut capture = capture(Arc::clone(&face), Arc::clone(&speech));

        let question = Question::gameplay("Did you water the plants?").unwrap();
        capture.begin_capture(question).await.unwrap();
        assert_eq!(capture.phase(), CapturePhase::ReadPrompt);

        let outcome = capture.start_answering().await.unwrap();
        let CaptureOutcome::Resolved(response) = outcome else {
            panic!("expected Resolved, got {outcome:?}");
        };
        assert_eq!(response.answer, SpokenAnswer::Yes);
        assert_eq!(response.samples.len(), 2);
        assert!(response.response_duration >= Duration::from_millis(500));
        assert_eq!(capture.phase(), CapturePhase::Resolved);
        // one draining stop plus the idempotent cleanup stop
        assert_eq!(face.stops.load(Ordering::SeqCst), 2);
        assert!(!face.is_recording());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_discards_samples_and_allows_retry() {
        let face = Arc::new(MockFaceSource::new(vec![
            vec![sample(0.0)],
            vec![sample(0.0), sample(0.2)],
        ]));
        // first attempt never resolves; second answers quickly
        let speech = Arc::new(MockSpeechSource::new(vec![
            (Duration::from_secs(60), SpeechOutcome::Timeout),
            (Duration::from_millis(200), SpeechOutcome::Answer(SpokenAnswer::No)),
        ]));
        let mut capture = capture(Arc::clone(&face), Arc::clone(&speech));

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();
        let outcome = capture.start_answering().await.unwrap();
        assert!(matches!(outcome, CaptureOutcome::TimedOut));
        assert_eq!(capture.phase(), CapturePhase::TimedOut);
        // the in-flight recognition was cancelled on exit
        assert!(speech.cancels.load(Ordering::SeqCst) >= 1);

        capture.retry().await.unwrap();
        assert_eq!(capture.phase(), CapturePhase::ReadPrompt);

        let outcome = capture.start_answering().await.unwrap();
        let CaptureOutcome::Resolved(response) = outcome else {
            panic!("expected Resolved after retry");
        };
        // no samples from the abandoned first attempt leaked through
        assert_eq!(response.samples.len(), 2);
        assert_eq!(response.answer, SpokenAnswer::No);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recognizer_timeout_outcome() {
        let face = Arc::new(MockFaceSource::new(vec![vec![sample(0.0)]]));
        let speech = Arc::new(MockSpeechSource::new(vec![(
            Duration::from_millis(300),
            SpeechOutcome::Timeout,
        )]));
        let mut capture = capture(face, speech);

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();
        let outcome = capture.start_answering().await.unwrap();
        assert!(matches!(outcome, CaptureOutcome::TimedOut));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recognition_error_tagged_failed() {
        let face = Arc::new(MockFaceSource::new(vec![vec![sample(0.0)]]));
        let speech = Arc::new(MockSpeechSource::new(vec![(
            Duration::from_millis(100),
            SpeechOutcome::Error("audio session interrupted".to_string()),
        )]));
        let mut capture = capture(face, speech);

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();
        let outcome = capture.start_answering().await.unwrap();
        let CaptureOutcome::Failed(message) = outcome else {
            panic!("expected Failed");
        };
        assert_eq!(message, "audio session interrupted");
        assert_eq!(capture.phase(), CapturePhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calibration_mismatch_rejected() {
        let face = Arc::new(MockFaceSource::new(vec![
            vec![sample(0.0)],
            vec![sample(0.0)],
        ]));
        let speech = Arc::new(MockSpeechSource::new(vec![
            (Duration::from_millis(100), SpeechOutcome::Answer(SpokenAnswer::No)),
            (Duration::from_millis(100), SpeechOutcome::Answer(SpokenAnswer::Yes)),
        ]));
        let mut capture = capture(face, speech);

        let question = Question::calibration("Is today a weekday?", SpokenAnswer::Yes).unwrap();
        capture.begin_capture(question).await.unwrap();

        let outcome = capture.start_answering().await.unwrap();
        let CaptureOutcome::Rejected { answer } = outcome else {
            panic!("expected Rejected");
        };
        assert_eq!(answer, SpokenAnswer::No);
        assert_eq!(capture.phase(), CapturePhase::Rejected);

        // the same question replays and the matching answer resolves
        capture.retry().await.unwrap();
        let outcome = capture.start_answering().await.unwrap();
        assert!(matches!(outcome, CaptureOutcome::Resolved(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_recording() {
        let face = Arc::new(MockFaceSource::new(vec![vec![sample(0.0)]]));
        // never resolves; cancellation must win the race
        let speech = Arc::new(MockSpeechSource::new(vec![]));
        let mut capture = capture(Arc::clone(&face), Arc::clone(&speech));

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();

        let handle = capture.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        });

        let outcome = capture.start_answering().await.unwrap();
        assert!(matches!(outcome, CaptureOutcome::Cancelled));
        assert_eq!(capture.phase(), CapturePhase::Idle);
        assert!(!face.is_recording());
        assert!(speech.cancels.load(Ordering::SeqCst) >= 1);

        // a fresh attempt works after cancellation
        capture
            .begin_capture(Question::gameplay("Still there?").unwrap())
            .await
            .unwrap();
        assert_eq!(capture.phase(), CapturePhase::ReadPrompt);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_countdown() {
        let face = Arc::new(MockFaceSource::new(vec![]));
        let speech = Arc::new(MockSpeechSource::new(vec![]));
        let mut capture = ResponseCapture::new(
            face,
            speech,
            fast_params().with_countdown(Duration::from_secs(60)),
        );

        let handle = capture.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let err = capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Cancelled));
        assert_eq!(capture.phase(), CapturePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_face_blocks_recording() {
        let face = Arc::new(MockFaceSource::new(vec![]));
        face.set_ready(false);
        let speech = Arc::new(MockSpeechSource::new(vec![]));
        let mut capture = capture(face, speech);

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();
        let err = capture.start_answering().await.unwrap_err();
        assert!(matches!(err, CaptureError::FaceNotReady));
        // still waiting at the prompt; caller can try again once tracking
        // recovers
        assert_eq!(capture.phase(), CapturePhase::ReadPrompt);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_gating() {
        let face = Arc::new(MockFaceSource::new(vec![]));
        let speech = Arc::new(MockSpeechSource::new(vec![]));
        let mut capture = capture(face, speech);

        // cannot record or retry from Idle
        assert!(matches!(
            capture.start_answering().await.unwrap_err(),
            CaptureError::InvalidPhase { .. }
        ));
        assert!(matches!(
            capture.retry().await.unwrap_err(),
            CaptureError::InvalidPhase { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_is_idempotent() {
        let face = Arc::new(MockFaceSource::new(vec![vec![sample(0.0)]]));
        let speech = Arc::new(MockSpeechSource::new(vec![]));
        let mut capture = capture(Arc::clone(&face), Arc::clone(&speech));

        capture
            .begin_capture(Question::gameplay("Do you snore?").unwrap())
            .await
            .unwrap();
        capture.reset();
        capture.reset();
        assert_eq!(capture.phase(), CapturePhase::Idle);

        // double stop on the source: first drains, second returns empty
        face.start();
        let first = face.stop();
        let second = face.stop();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CapturePhase::ReadPrompt.to_string(), "read_prompt");
        assert_eq!(CapturePhase::Recording.to_string(), "recording");
        assert!(CapturePhase::Resolved.is_terminal());
        assert!(!CapturePhase::Resolved.is_retryable());
        assert!(CapturePhase::Rejected.is_retryable());
    }
}
