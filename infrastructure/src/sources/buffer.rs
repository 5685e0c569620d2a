//! Shared sample buffer
//!
//! Frames arrive from a producer task while the orchestrator may
//! concurrently drain on `stop()`, so all buffer state sits behind one
//! mutex. Each recording window gets a generation number; pushes carrying
//! a stale generation (a producer that outlived its window) are dropped
//! rather than leaking into the next attempt.

use bluff_domain::{FaceSample, HeadRotation};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::time::Instant;

struct BufferState {
    recording: bool,
    generation: u64,
    started_at: Instant,
    samples: Vec<FaceSample>,
}

/// Mutex-guarded sample buffer shared between a frame producer and the
/// capture orchestrator.
pub struct SampleBuffer {
    inner: Mutex<BufferState>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BufferState {
                recording: false,
                generation: 0,
                started_at: Instant::now(),
                samples: Vec::new(),
            }),
        }
    }

    /// Open a recording window: clears the buffer, stamps the start
    /// instant, and returns the new generation producers must tag their
    /// pushes with.
    pub fn arm(&self) -> u64 {
        let mut state = self.inner.lock().unwrap();
        state.recording = true;
        state.generation += 1;
        state.started_at = Instant::now();
        state.samples.clear();
        state.generation
    }

    /// Append a frame, stamped relative to the window start.
    ///
    /// Returns `false` (dropping the frame) when no window is open or the
    /// generation is stale; producers use that as their stop signal.
    pub fn push(
        &self,
        generation: u64,
        features: BTreeMap<String, f32>,
        rotation: HeadRotation,
    ) -> bool {
        let mut state = self.inner.lock().unwrap();
        if !state.recording || state.generation != generation {
            return false;
        }
        let timestamp = state.started_at.elapsed().as_secs_f64();
        state
            .samples
            .push(FaceSample::new(timestamp, features, rotation));
        true
    }

    /// Close the window and take the samples.
    ///
    /// Idempotent: draining an unarmed buffer returns an empty sequence.
    pub fn drain(&self) -> Vec<FaceSample> {
        let mut state = self.inner.lock().unwrap();
        if !state.recording {
            return Vec::new();
        }
        state.recording = false;
        std::mem::take(&mut state.samples)
    }

    pub fn is_recording(&self) -> bool {
        self.inner.lock().unwrap().recording
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_empty(buffer: &SampleBuffer, generation: u64) -> bool {
        buffer.push(generation, BTreeMap::new(), HeadRotation::default())
    }

    #[test]
    fn test_push_requires_open_window() {
        let buffer = SampleBuffer::new();
        assert!(!push_empty(&buffer, 0));

        let generation = buffer.arm();
        assert!(push_empty(&buffer, generation));
        assert_eq!(buffer.drain().len(), 1);
    }

    #[test]
    fn test_stale_generation_dropped() {
        let buffer = SampleBuffer::new();
        let old = buffer.arm();
        let _ = buffer.drain();

        let new = buffer.arm();
        // a producer from the previous window cannot leak into this one
        assert!(!push_empty(&buffer, old));
        assert!(push_empty(&buffer, new));
        assert_eq!(buffer.drain().len(), 1);
    }

    #[test]
    fn test_drain_is_idempotent() {
        let buffer = SampleBuffer::new();
        let generation = buffer.arm();
        push_empty(&buffer, generation);
        push_empty(&buffer, generation);

        assert_eq!(buffer.drain().len(), 2);
        assert!(buffer.drain().is_empty());
        assert!(!buffer.is_recording());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timestamps_relative_and_non_decreasing() {
        let buffer = SampleBuffer::new();
        let generation = buffer.arm();

        push_empty(&buffer, generation);
        tokio::time::advance(std::time::Duration::from_millis(33)).await;
        push_empty(&buffer, generation);
        tokio::time::advance(std::time::Duration::from_millis(33)).await;
        push_empty(&buffer, generation);

        let samples = buffer.drain();
        assert_eq!(samples.len(), 3);
        assert!(samples[0].timestamp < 1e-6);
        assert!(samples.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
    }
}
