//! Run Session use case
//!
//! Drives one gameplay session: captures a response per question, scores
//! each against the player's calibration, and reduces the verdicts to a
//! session summary.

use crate::config::capture_params::CaptureParams;
use crate::ports::calibration_store::{CalibrationStore, StoreError};
use crate::ports::capture_feedback::CaptureFeedback;
use crate::ports::face_source::FaceSampleSource;
use crate::ports::progress::SessionProgress;
use crate::ports::session_logger::{SessionEvent, SessionLogger};
use crate::ports::speech_source::SpeechAnswerSource;
use crate::use_cases::capture_response::{CaptureError, ResponseCapture};
use crate::use_cases::shared::{self, CaptureTally, RetryOutcome};
use bluff_domain::{
    PlayerId, Question, QuestionVerdict, ScoringParams, SessionSummary, score,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur during a game session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No gameplay questions provided")]
    NoQuestions,

    #[error("Question {index} still unresolved after {attempts} attempts")]
    AttemptsExhausted { index: usize, attempts: u32 },

    #[error("Session cancelled")]
    Cancelled,

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct SessionInput {
    /// The player being questioned
    pub player: PlayerId,
    /// Gameplay questions, in asking order
    pub questions: Vec<Question>,
    /// Scoring thresholds
    pub scoring: ScoringParams,
}

impl SessionInput {
    pub fn new(player: PlayerId, questions: Vec<Question>) -> Self {
        Self {
            player,
            questions,
            scoring: ScoringParams::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringParams) -> Self {
        self.scoring = scoring;
        self
    }
}

/// A completed session: per-question verdicts plus the aggregate.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub verdicts: Vec<QuestionVerdict>,
    pub summary: SessionSummary,
}

/// Use case for running a gameplay question session
pub struct RunSessionUseCase<F, S> {
    capture: ResponseCapture<F, S>,
    store: Arc<dyn CalibrationStore>,
}

impl<F, S> RunSessionUseCase<F, S>
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

    /// Token outside collaborators can use to abort the session.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.capture.cancel_handle()
    }

    /// Execute the session flow.
    pub async fn execute(
        &mut self,
        input: SessionInput,
        progress: &dyn SessionProgress,
        logger: &dyn SessionLogger,
    ) -> Result<SessionOutcome, SessionError> {
        if input.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        // Absence of calibration is not an error: every verdict falls back
        // to the defined neutral result.
        let calibration = self.store.load(&input.player).await?;
        if calibration.is_none() {
            debug!("No calibration for {}; verdicts will be neutral", input.player);
        }

        info!(
            "Starting session for {} with {} questions",
            input.player,
            input.questions.len()
        );

        let total = input.questions.len();
        let mut verdicts = Vec::with_capacity(total);
        let mut tally = CaptureTally::default();

        for (index, question) in input.questions.iter().enumerate() {
            progress.on_question_start(index, total);
            match shared::capture_with_retries(&mut self.capture, question, progress, &mut tally)
                .await?
            {
                RetryOutcome::Resolved(response) => {
                    let verdict = score(&response, calibration.as_ref(), &input.scoring);
                    debug!(
                        "Verdict for question {}: confidence {:.2} ({})",
                        index,
                        verdict.confidence,
                        verdict.factors.join(", ")
                    );
                    progress.on_verdict(&verdict);
                    logger.log(SessionEvent::new(
                        "verdict",
                        json!({
                            "player": input.player.as_str(),
                            "question": question.prompt(),
                            "answer": response.answer.as_str(),
                            "confidence": verdict.confidence,
                            "suspicious": verdict.is_suspicious,
                            "factors": verdict.factors,
                        }),
                    ));
                    verdicts.push(verdict);
                }
                RetryOutcome::Cancelled => return Err(SessionError::Cancelled),
                RetryOutcome::Exhausted { attempts } => {
                    return Err(SessionError::AttemptsExhausted { index, attempts });
                }
            }
        }

        let summary = SessionSummary::from_verdicts(&verdicts);
        info!(
            "Session complete: {}/{} suspicious -> {}",
            summary.suspicious, summary.total, summary.reading
        );
        logger.log(SessionEvent::new(
            "session_complete",
            json!({
                "player": input.player.as_str(),
                "total": summary.total,
                "suspicious": summary.suspicious,
                "reading": summary.reading.as_str(),
            }),
        ));

        Ok(SessionOutcome { verdicts, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::session_logger::NoSessionLogger;
    use crate::ports::speech_source::SpeechOutcome;
    use async_trait::async_trait;
    use bluff_domain::{
        CalibrationData, FaceSample, FacialBaseline, HeadRotation, SessionReading, SignalStats,
        SpokenAnswer,
    };
    use std::collections::{BTreeMap, HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct ScriptedFace {
        recording: Mutex<bool>,
    }

    impl FaceSampleSource for ScriptedFace {
        fn start(&self) {
            *self.recording.lock().unwrap() = true;
        }

        fn stop(&self) -> Vec<FaceSample> {
            let mut recording = self.recording.lock().unwrap();
            if !*recording {
                return Vec::new();
            }
            *recording = false;
            vec![
                FaceSample::new(0.0, BTreeMap::new(), HeadRotation::default()),
                FaceSample::new(0.4, BTreeMap::new(), HeadRotation::default()),
            ]
        }

        fn is_recording(&self) -> bool {
            *self.recording.lock().unwrap()
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    struct ScriptedSpeech {
        outcomes: Mutex<VecDeque<SpeechOutcome>>,
    }

    #[async_trait]
    impl SpeechAnswerSource for ScriptedSpeech {
        async fn listen(&self, _timeout: Duration) -> SpeechOutcome {
            tokio::time::sleep(Duration::from_millis(500)).await;
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(SpeechOutcome::Timeout)
        }

        fn cancel(&self) {}
    }

    struct MemoryStore {
        data: Mutex<HashMap<String, CalibrationData>>,
    }

    #[async_trait]
    impl CalibrationStore for MemoryStore {
        async fn save(&self, player: &PlayerId, data: &CalibrationData) -> Result<(), StoreError> {
            self.data
                .lock()
                .unwrap()
                .insert(player.as_str().to_string(), data.clone());
            Ok(())
        }

        async fn load(&self, player: &PlayerId) -> Result<Option<CalibrationData>, StoreError> {
            Ok(self.data.lock().unwrap().get(player.as_str()).cloned())
        }
    }

    fn baseline(blink: SignalStats, duration: SignalStats) -> FacialBaseline {
        FacialBaseline {
            blink_rate: blink,
            gaze_stability: SignalStats::new(0.5, 0.0),
            response_duration: duration,
            blendshapes: BTreeMap::new(),
        }
    }

    fn store_with(player: &PlayerId, data: CalibrationData) -> Arc<MemoryStore> {
        let mut map = HashMap::new();
        map.insert(player.as_str().to_string(), data);
        Arc::new(MemoryStore {
            data: Mutex::new(map),
        })
    }

    fn use_case(
        answers: Vec<SpokenAnswer>,
        store: Arc<MemoryStore>,
    ) -> RunSessionUseCase<ScriptedFace, ScriptedSpeech> {
        let face = Arc::new(ScriptedFace {
            recording: Mutex::new(false),
        });
        let speech = Arc::new(ScriptedSpeech {
            outcomes: Mutex::new(
                answers
                    .into_iter()
                    .map(SpeechOutcome::Answer)
                    .collect::<VecDeque<_>>(),
            ),
        });
        let params = CaptureParams::default()
            .with_countdown(Duration::from_millis(10))
            .with_answer_timeout(Duration::from_secs(2));
        RunSessionUseCase::new(face, speech, store, params)
    }

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::gameplay(format!("Question {i}?")).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncalibrated_player_gets_neutral_verdicts() {
        let store = Arc::new(MemoryStore {
            data: Mutex::new(HashMap::new()),
        });
        let mut use_case = use_case(vec![SpokenAnswer::Yes, SpokenAnswer::No], store);

        let input = SessionInput::new(PlayerId::new("mallory").unwrap(), questions(2));
        let outcome = use_case
            .execute(input, &NoProgress, &NoSessionLogger)
            .await
            .unwrap();

        assert_eq!(outcome.verdicts.len(), 2);
        for verdict in &outcome.verdicts {
            assert_eq!(verdict.confidence, 0.5);
            assert!(!verdict.is_suspicious);
            assert_eq!(verdict.factors, vec!["no calibration".to_string()]);
        }
        assert_eq!(outcome.summary.reading, SessionReading::MostlyTruthful);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calibrated_player_in_profile_scores_clean() {
        let player = PlayerId::new("alice").unwrap();
        // captures resolve after 500 ms with no blinks and a still head,
        // matching this baseline exactly
        let b = baseline(SignalStats::new(0.0, 0.1), SignalStats::new(0.5, 0.1));
        let data = CalibrationData {
            truthful_yes: b.clone(),
            truthful_no: b,
            sample_count: 8,
            average_face_confidence: 1.0,
            created_at: "2026-02-03T10:00:00Z".to_string(),
        };
        let mut use_case = use_case(
            vec![SpokenAnswer::Yes, SpokenAnswer::No, SpokenAnswer::Yes],
            store_with(&player, data),
        );

        let input = SessionInput::new(player, questions(3));
        let outcome = use_case
            .execute(input, &NoProgress, &NoSessionLogger)
            .await
            .unwrap();

        for verdict in &outcome.verdicts {
            assert_eq!(verdict.confidence, 0.0);
            assert_eq!(verdict.factors, vec!["normal pattern".to_string()]);
        }
        assert_eq!(outcome.summary.reading, SessionReading::MostlyTruthful);
        assert_eq!(outcome.summary.suspicious, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deviating_player_reads_mostly_lying() {
        let player = PlayerId::new("bob").unwrap();
        // baseline expects brisk blinking and sub-second answers; the
        // scripted captures (no blinks, 500 ms) deviate on blink rate,
        // duration, and the extreme-pause margin
        let b = baseline(SignalStats::new(1.0, 0.1), SignalStats::new(0.1, 0.05));
        let data = CalibrationData {
            truthful_yes: b.clone(),
            truthful_no: b,
            sample_count: 8,
            average_face_confidence: 1.0,
            created_at: "2026-02-03T10:00:00Z".to_string(),
        };
        let mut use_case = use_case(
            vec![SpokenAnswer::Yes, SpokenAnswer::No],
            store_with(&player, data),
        );

        let input = SessionInput::new(player, questions(2));
        let outcome = use_case
            .execute(input, &NoProgress, &NoSessionLogger)
            .await
            .unwrap();

        for verdict in &outcome.verdicts {
            // less blinking (0.30) + longer response (0.25) + long pause (0.10)
            assert!((verdict.confidence - 0.65).abs() < 1e-9);
            assert!(verdict.is_suspicious);
        }
        assert_eq!(outcome.summary.reading, SessionReading::MostlyLying);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_question_list_rejected() {
        let store = Arc::new(MemoryStore {
            data: Mutex::new(HashMap::new()),
        });
        let mut use_case = use_case(vec![], store);

        let input = SessionInput::new(PlayerId::new("erin").unwrap(), vec![]);
        assert!(matches!(
            use_case
                .execute(input, &NoProgress, &NoSessionLogger)
                .await
                .unwrap_err(),
            SessionError::NoQuestions
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_retry_then_exhaust() {
        let store = Arc::new(MemoryStore {
            data: Mutex::new(HashMap::new()),
        });
        // no scripted answers at all: every listen outlives the window
        let face = Arc::new(ScriptedFace {
            recording: Mutex::new(false),
        });
        let speech = Arc::new(ScriptedSpeech {
            outcomes: Mutex::new(VecDeque::new()),
        });
        let params = CaptureParams::default()
            .with_countdown(Duration::from_millis(10))
            .with_answer_timeout(Duration::from_millis(100))
            .with_max_attempts(2);
        let mut use_case = RunSessionUseCase::new(face, speech, store, params);

        let input = SessionInput::new(PlayerId::new("frank").unwrap(), questions(1));
        let err = use_case
            .execute(input, &NoProgress, &NoSessionLogger)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::AttemptsExhausted { index: 0, attempts: 2 }
        ));
    }
}
