//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file and
//! convert into the application/domain parameter types after validation.

use bluff_application::CaptureParams;
use bluff_application::config::capture_params::CaptureParamsError;
use bluff_domain::ScoringParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid capture parameters: {0}")]
    InvalidCapture(#[from] CaptureParamsError),
}

/// Raw capture timing configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCaptureConfig {
    /// Countdown before the prompt is shown, in seconds
    pub countdown_secs: f64,
    /// Answer window, in seconds
    pub answer_timeout_secs: f64,
    /// Expected sensor frame rate, used for capture-quality scoring
    pub nominal_sample_rate_hz: f64,
    /// Attempts per question before the session gives up
    pub max_attempts_per_question: u32,
}

impl Default for FileCaptureConfig {
    fn default() -> Self {
        let params = CaptureParams::default();
        Self {
            countdown_secs: params.countdown.as_secs_f64(),
            answer_timeout_secs: params.answer_timeout.as_secs_f64(),
            nominal_sample_rate_hz: params.nominal_sample_rate_hz,
            max_attempts_per_question: params.max_attempts_per_question,
        }
    }
}

/// Raw scoring threshold configuration from TOML
///
/// The thresholds are tunable constants; the factor weights are part of
/// the scoring model and deliberately not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScoringConfig {
    pub blink_sigma: f64,
    pub duration_sigma: f64,
    pub head_movement_threshold: f64,
    pub brow_tension_threshold: f64,
    pub extreme_pause_sigma: f64,
}

impl Default for FileScoringConfig {
    fn default() -> Self {
        let params = ScoringParams::default();
        Self {
            blink_sigma: params.blink_sigma,
            duration_sigma: params.duration_sigma,
            head_movement_threshold: params.head_movement_threshold,
            brow_tension_threshold: params.brow_tension_threshold,
            extreme_pause_sigma: params.extreme_pause_sigma,
        }
    }
}

/// Complete raw configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub capture: FileCaptureConfig,
    pub scoring: FileScoringConfig,
}

impl FileConfig {
    /// Validated capture parameters.
    pub fn capture_params(&self) -> Result<CaptureParams, ConfigError> {
        let params = CaptureParams::default()
            .with_countdown(Duration::from_secs_f64(self.capture.countdown_secs.max(0.0)))
            .with_answer_timeout(Duration::from_secs_f64(
                self.capture.answer_timeout_secs.max(0.0),
            ))
            .with_sample_rate(self.capture.nominal_sample_rate_hz)
            .with_max_attempts(self.capture.max_attempts_per_question);
        params.validate()?;
        Ok(params)
    }

    /// Scoring thresholds.
    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            blink_sigma: self.scoring.blink_sigma,
            duration_sigma: self.scoring.duration_sigma,
            head_movement_threshold: self.scoring.head_movement_threshold,
            brow_tension_threshold: self.scoring.brow_tension_threshold,
            extreme_pause_sigma: self.scoring.extreme_pause_sigma,
        }
    }
}
