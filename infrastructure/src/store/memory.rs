//! In-memory calibration store
//!
//! Process-lifetime adapter for the persistence boundary. A party runs one
//! app session; durable profile storage belongs to the surrounding
//! application, not this core.

use async_trait::async_trait;
use bluff_application::{CalibrationStore, StoreError};
use bluff_domain::{CalibrationData, PlayerId};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Mutex-guarded map of player id to calibration data.
pub struct InMemoryCalibrationStore {
    data: Mutex<HashMap<PlayerId, CalibrationData>>,
}

impl InMemoryCalibrationStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Number of calibrated players.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().is_empty()
    }
}

impl Default for InMemoryCalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalibrationStore for InMemoryCalibrationStore {
    async fn save(&self, player: &PlayerId, data: &CalibrationData) -> Result<(), StoreError> {
        debug!(
            "Storing calibration for {} ({} samples)",
            player, data.sample_count
        );
        // recalibration replaces wholesale, never merges
        self.data
            .lock()
            .unwrap()
            .insert(player.clone(), data.clone());
        Ok(())
    }

    async fn load(&self, player: &PlayerId) -> Result<Option<CalibrationData>, StoreError> {
        Ok(self.data.lock().unwrap().get(player).cloned())
    }
}
