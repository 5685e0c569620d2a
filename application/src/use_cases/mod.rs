//! Use cases: capture orchestration and the calibration/game flows built
//! on top of it.

pub mod capture_response;
pub mod run_calibration;
pub mod run_session;
pub mod shared;
