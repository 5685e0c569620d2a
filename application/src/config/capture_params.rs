//! Capture timing parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Parameter validation errors
#[derive(Error, Debug)]
pub enum CaptureParamsError {
    #[error("answer timeout cannot be zero")]
    ZeroTimeout,

    #[error("nominal sample rate must be positive")]
    InvalidSampleRate,

    #[error("max attempts per question cannot be zero")]
    ZeroAttempts,
}

/// Timing and retry parameters for the capture orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureParams {
    /// Delay between `beginCapture` and the question prompt being shown
    pub countdown: Duration,
    /// Window the speech recognizer gets before the attempt times out
    pub answer_timeout: Duration,
    /// Sensor frame rate used to judge capture quality (frames expected
    /// per second of response window)
    pub nominal_sample_rate_hz: f64,
    /// Attempts per question before a use case gives up
    pub max_attempts_per_question: u32,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            countdown: Duration::from_secs(3),
            answer_timeout: Duration::from_secs(10),
            nominal_sample_rate_hz: 30.0,
            max_attempts_per_question: 3,
        }
    }
}

impl CaptureParams {
    pub fn with_countdown(mut self, countdown: Duration) -> Self {
        self.countdown = countdown;
        self
    }

    pub fn with_answer_timeout(mut self, timeout: Duration) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn with_sample_rate(mut self, hz: f64) -> Self {
        self.nominal_sample_rate_hz = hz;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts_per_question = attempts;
        self
    }

    pub fn validate(&self) -> Result<(), CaptureParamsError> {
        if self.answer_timeout.is_zero() {
            return Err(CaptureParamsError::ZeroTimeout);
        }
        if !self.nominal_sample_rate_hz.is_finite() || self.nominal_sample_rate_hz <= 0.0 {
            return Err(CaptureParamsError::InvalidSampleRate);
        }
        if self.max_attempts_per_question == 0 {
            return Err(CaptureParamsError::ZeroAttempts);
        }
        Ok(())
    }
}
