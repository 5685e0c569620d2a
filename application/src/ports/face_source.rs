//! Face sample source port
//!
//! Defines the interface to the face-tracking capture pipeline. The source
//! owns its sample buffer and its frame cadence; the orchestrator only
//! starts and stops recording windows and collects what was captured.

use bluff_domain::FaceSample;

/// A push-style source of timestamped facial feature frames.
///
/// Frames arrive from a background capture thread while recording is
/// active, so implementations must serialize buffer access internally.
pub trait FaceSampleSource: Send + Sync {
    /// Begin a recording window. Frames captured from here on are buffered
    /// with timestamps relative to this call.
    fn start(&self);

    /// End the recording window and drain the buffer.
    ///
    /// Idempotent: stopping an already-stopped source returns an empty
    /// sequence, never an error.
    fn stop(&self) -> Vec<FaceSample>;

    /// Whether a recording window is currently open.
    fn is_recording(&self) -> bool;

    /// Whether tracking quality is good enough to record.
    ///
    /// Position and orientation gating are the source's responsibility;
    /// the orchestrator only refuses to enter recording while this reports
    /// false.
    fn is_ready(&self) -> bool;
}
