//! Synthetic face source
//!
//! A deterministic stand-in for the camera face-tracking pipeline: on
//! `start()` a background task generates frames at the configured cadence
//! from a fixed behavioral profile. No randomness, so demos and tests are
//! exactly reproducible.

use crate::sources::buffer::SampleBuffer;
use bluff_application::FaceSampleSource;
use bluff_domain::{FaceSample, HeadRotation, blendshapes};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// A fixed facial behavior profile driving the frame generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceProfile {
    /// Seconds between blinks
    pub blink_period_secs: f64,
    /// Per-frame head swing amplitude (radians); alternates sign each frame
    pub head_jitter: f32,
    /// Constant inner-brow-raise intensity
    pub brow_level: f32,
    /// Smile asymmetry: left = base + asym, right = base - asym
    pub smile_asymmetry: f32,
}

impl FaceProfile {
    /// A relaxed truthful answerer: slow blinks, still head, low brow.
    pub fn calm() -> Self {
        Self {
            blink_period_secs: 4.0,
            head_jitter: 0.005,
            brow_level: 0.1,
            smile_asymmetry: 0.02,
        }
    }

    /// A fidgety answerer: rapid blinks, jerky head, raised brow.
    pub fn nervous() -> Self {
        Self {
            blink_period_secs: 0.8,
            head_jitter: 0.12,
            brow_level: 0.7,
            smile_asymmetry: 0.15,
        }
    }

    /// Generate the feature frame for one tick.
    fn frame(&self, index: u64, dt: f64) -> (BTreeMap<String, f32>, HeadRotation) {
        let t = index as f64 * dt;
        // one closed-lids frame at each blink period boundary
        let blink = if (t % self.blink_period_secs) < dt { 0.9 } else { 0.05 };
        let swing = if index % 2 == 0 {
            self.head_jitter
        } else {
            -self.head_jitter
        };

        let mut features = BTreeMap::new();
        features.insert(blendshapes::EYE_BLINK_LEFT.to_string(), blink);
        features.insert(blendshapes::EYE_BLINK_RIGHT.to_string(), blink);
        features.insert(blendshapes::BROW_INNER_UP.to_string(), self.brow_level);
        features.insert(blendshapes::JAW_OPEN.to_string(), 0.2);
        features.insert(
            blendshapes::MOUTH_SMILE_LEFT.to_string(),
            0.3 + self.smile_asymmetry,
        );
        features.insert(
            blendshapes::MOUTH_SMILE_RIGHT.to_string(),
            0.3 - self.smile_asymmetry,
        );

        (features, HeadRotation::new(swing, swing, 0.0))
    }
}

/// Face sample source generating deterministic frames on a tokio task.
///
/// `start`/`stop` follow the port contract: stop drains the mutex-guarded
/// buffer exactly once and is a no-op afterwards; a producer task that
/// outlives its window is cut off by the buffer's generation check.
pub struct SyntheticFaceSource {
    profile: FaceProfile,
    frame_interval: Duration,
    buffer: Arc<SampleBuffer>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SyntheticFaceSource {
    /// Create a source producing frames at the given sensor rate.
    ///
    /// Must be used inside a tokio runtime; `start()` spawns the producer
    /// task.
    pub fn new(profile: FaceProfile, sample_rate_hz: f64) -> Self {
        Self {
            profile,
            frame_interval: Duration::from_secs_f64(1.0 / sample_rate_hz),
            buffer: Arc::new(SampleBuffer::new()),
            task: Mutex::new(None),
        }
    }
}

impl FaceSampleSource for SyntheticFaceSource {
    fn start(&self) {
        let generation = self.buffer.arm();
        debug!("Synthetic face source recording (generation {})", generation);

        let buffer = Arc::clone(&self.buffer);
        let profile = self.profile;
        let interval = self.frame_interval;
        let handle = tokio::spawn(async move {
            let dt = interval.as_secs_f64();
            let mut ticker = tokio::time::interval(interval);
            let mut index: u64 = 0;
            loop {
                ticker.tick().await;
                let (features, rotation) = profile.frame(index, dt);
                if !buffer.push(generation, features, rotation) {
                    // window closed or superseded
                    break;
                }
                index += 1;
            }
        });

        if let Some(previous) = self.task.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    fn stop(&self) -> Vec<FaceSample> {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
        self.buffer.drain()
    }

    fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    fn is_ready(&self) -> bool {
        // synthetic tracking is always in frame and well lit
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluff_domain::blink_count;

    #[tokio::test(start_paused = true)]
    async fn test_generates_frames_at_cadence() {
        let source = SyntheticFaceSource::new(FaceProfile::calm(), 30.0);
        source.start();
        assert!(source.is_recording());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let samples = source.stop();

        // ~60 frames captured over 2 seconds at 30 Hz
        assert!(samples.len() >= 55 && samples.len() <= 65, "got {}", samples.len());
        assert!(samples.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
        assert!(!source.is_recording());
        assert!(source.stop().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_profiles_differ_in_blinking() {
        let calm = SyntheticFaceSource::new(FaceProfile::calm(), 30.0);
        calm.start();
        tokio::time::sleep(Duration::from_secs(4)).await;
        let calm_samples = calm.stop();

        let nervous = SyntheticFaceSource::new(FaceProfile::nervous(), 30.0);
        nervous.start();
        tokio::time::sleep(Duration::from_secs(4)).await;
        let nervous_samples = nervous.stop();

        assert!(blink_count(&nervous_samples) > blink_count(&calm_samples));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_supersedes_previous_window() {
        let source = SyntheticFaceSource::new(FaceProfile::calm(), 30.0);
        source.start();
        tokio::time::sleep(Duration::from_millis(500)).await;

        // restart without stopping: old producer is cut off by generation
        source.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let samples = source.stop();

        // only the second window's frames, timestamps restarting near 0
        assert!(samples.first().unwrap().timestamp < 0.1);
        assert!(samples.last().unwrap().timestamp < 0.6);
    }
}
