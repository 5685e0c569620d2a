//! Calibration store port
//!
//! Persistence boundary for calibration output. The core hands a player's
//! `CalibrationData` across this port and never touches a file or database
//! itself.

use async_trait::async_trait;
use bluff_domain::{CalibrationData, PlayerId};
use thiserror::Error;

/// Errors that can occur at the persistence boundary
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Store for per-player calibration data, keyed by player identity.
///
/// Saving replaces any existing calibration wholesale; baselines are never
/// merged across calibration runs.
#[async_trait]
pub trait CalibrationStore: Send + Sync {
    /// Persist a player's calibration, replacing any previous one.
    async fn save(&self, player: &PlayerId, data: &CalibrationData) -> Result<(), StoreError>;

    /// Fetch a player's calibration. `Ok(None)` for an uncalibrated
    /// player; absence is not an error.
    async fn load(&self, player: &PlayerId) -> Result<Option<CalibrationData>, StoreError>;
}
