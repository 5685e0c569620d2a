//! Application layer for bluffcheck
//!
//! Use cases and ports. The capture orchestrator lives here: it sequences
//! the two asynchronous capture sources (facial frames, speech recognizer)
//! into atomic response records, and the calibration/session use cases
//! drive it against the pure domain scoring.
//!
//! Ports define how the application talks to the outside world; adapters
//! live in the infrastructure layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export the main public surface
pub use config::capture_params::CaptureParams;
pub use ports::{
    calibration_store::{CalibrationStore, StoreError},
    capture_feedback::{CaptureFeedback, NoFeedback},
    face_source::FaceSampleSource,
    progress::{NoProgress, SessionProgress},
    session_logger::{NoSessionLogger, SessionEvent, SessionLogger},
    speech_source::{SpeechAnswerSource, SpeechOutcome},
};
pub use use_cases::{
    capture_response::{CaptureError, CaptureOutcome, CapturePhase, ResponseCapture},
    run_calibration::{
        CalibrationError, CalibrationInput, CalibrationReport, RunCalibrationUseCase,
    },
    run_session::{RunSessionUseCase, SessionError, SessionInput, SessionOutcome},
};
