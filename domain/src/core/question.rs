//! Question value object

use crate::core::answer::SpokenAnswer;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A yes/no question posed to a player (Value Object)
///
/// Calibration questions carry the expected truthful answer so the
/// orchestrator can reject responses that would poison the baseline.
/// Gameplay questions carry no expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    expected_answer: Option<SpokenAnswer>,
}

impl Question {
    /// Create a gameplay question with no expected answer.
    pub fn gameplay(prompt: impl Into<String>) -> Result<Self, DomainError> {
        Self::build(prompt, None)
    }

    /// Create a calibration question whose truthful answer is known.
    pub fn calibration(
        prompt: impl Into<String>,
        expected: SpokenAnswer,
    ) -> Result<Self, DomainError> {
        Self::build(prompt, Some(expected))
    }

    fn build(
        prompt: impl Into<String>,
        expected_answer: Option<SpokenAnswer>,
    ) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            expected_answer,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Expected truthful answer, present only for calibration questions.
    pub fn expected_answer(&self) -> Option<SpokenAnswer> {
        self.expected_answer
    }

    pub fn is_calibration(&self) -> bool {
        self.expected_answer.is_some()
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prompt)
    }
}
