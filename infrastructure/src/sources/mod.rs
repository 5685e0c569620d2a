//! Capture source adapters.

pub mod buffer;
pub mod scripted;
pub mod synthetic_face;
