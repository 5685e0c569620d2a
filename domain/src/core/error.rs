//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Only constructor validation lives here. Recoverable capture conditions
/// (timeouts, rejected answers, missing calibration) are expressed as result
/// variants in their own types, not as errors.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Question prompt cannot be empty")]
    EmptyPrompt,

    #[error("Player id cannot be empty")]
    EmptyPlayerId,
}
