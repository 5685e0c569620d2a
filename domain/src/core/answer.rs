//! Spoken answer value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A resolved yes/no answer from the speech recognizer (Value Object)
///
/// The game only ever asks closed questions, so the recognizer vocabulary
/// collapses to two polarities. Baselines are built per polarity because
/// truth-telling affect differs between "yes" and "no" answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpokenAnswer {
    Yes,
    No,
}

impl SpokenAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpokenAnswer::Yes => "yes",
            SpokenAnswer::No => "no",
        }
    }

    /// The opposite polarity.
    pub fn negated(&self) -> Self {
        match self {
            SpokenAnswer::Yes => SpokenAnswer::No,
            SpokenAnswer::No => SpokenAnswer::Yes,
        }
    }
}

impl std::fmt::Display for SpokenAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpokenAnswer {
    type Err = String;

    /// Parse a recognizer transcript into a polarity.
    ///
    /// Accepts the affirmative/negative variants speech engines commonly
    /// emit for casual speech ("yeah", "nope", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "yeah" | "yep" | "yup" | "sure" | "true" => Ok(SpokenAnswer::Yes),
            "no" | "nope" | "nah" | "false" => Ok(SpokenAnswer::No),
            other => Err(format!("Unrecognized answer: {other}")),
        }
    }
}
