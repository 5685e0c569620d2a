//! Infrastructure layer for bluffcheck
//!
//! Adapters for the application ports: deterministic capture sources (for
//! demos and tests), the in-memory calibration store, file/environment
//! configuration loading, and the JSONL session logger.

pub mod clock;
pub mod config;
pub mod logging;
pub mod sources;
pub mod store;


pub use clock::utc_now_rfc3339;
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use logging::jsonl_logger::JsonlSessionLogger;
pub use sources::{
    buffer::SampleBuffer,
    scripted::{ScriptedFaceSource, ScriptedSpeechSource},
    synthetic_face::{FaceProfile, SyntheticFaceSource},
};
pub use store::memory::InMemoryCalibrationStore;
