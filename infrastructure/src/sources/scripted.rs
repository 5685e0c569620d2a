//! Scripted capture sources
//!
//! Fully scripted adapters for tests and the demo driver: the face source
//! hands out preset sample batches, the speech source resolves queued
//! outcomes after fixed delays. Both honor the idempotency and
//! cancellation contracts of their ports.

use bluff_application::{FaceSampleSource, SpeechAnswerSource, SpeechOutcome};
use async_trait::async_trait;
use bluff_domain::FaceSample;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Face source returning one preset sample batch per recording window.
pub struct ScriptedFaceSource {
    batches: Mutex<VecDeque<Vec<FaceSample>>>,
    recording: AtomicBool,
    ready: AtomicBool,
}

impl ScriptedFaceSource {
    /// One batch is consumed per draining stop, in order. When the script
    /// runs out, further windows record empty.
    pub fn new(batches: Vec<Vec<FaceSample>>) -> Self {
        Self {
            batches: Mutex::new(VecDeque::from(batches)),
            recording: AtomicBool::new(false),
            ready: AtomicBool::new(true),
        }
    }

    /// Simulate the tracker losing (or regaining) the face.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl FaceSampleSource for ScriptedFaceSource {
    fn start(&self) {
        self.recording.store(true, Ordering::SeqCst);
    }

    fn stop(&self) -> Vec<FaceSample> {
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

/// Speech source resolving scripted outcomes after fixed delays.
///
/// `cancel` bumps a generation counter; a listen that was in flight when
/// the counter moved reports a timeout instead of its scripted outcome,
/// so late completions from a superseded attempt are provably inert.
pub struct ScriptedSpeechSource {
    script: Mutex<VecDeque<(Duration, SpeechOutcome)>>,
    generation: AtomicU64,
}

impl ScriptedSpeechSource {
    pub fn new(script: Vec<(Duration, SpeechOutcome)>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            generation: AtomicU64::new(0),
        }
    }

    /// Convenience: each outcome resolving after the same delay.
    pub fn with_uniform_delay(delay: Duration, outcomes: Vec<SpeechOutcome>) -> Self {
        Self::new(outcomes.into_iter().map(|o| (delay, o)).collect())
    }
}

#[async_trait]
impl SpeechAnswerSource for ScriptedSpeechSource {
    async fn listen(&self, timeout: Duration) -> SpeechOutcome {
        let generation = self.generation.load(Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let Some((delay, outcome)) = next else {
            // script exhausted: behave like silence
            tokio::time::sleep(timeout).await;
            return SpeechOutcome::Timeout;
        };

        tokio::time::sleep(delay.min(timeout)).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            // cancelled while we slept
            return SpeechOutcome::Timeout;
        }
        if delay >= timeout {
            return SpeechOutcome::Timeout;
        }
        outcome
    }

    fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
