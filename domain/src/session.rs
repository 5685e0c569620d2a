//! Session aggregation
//!
//! Reduces a session's verdicts to an overall classification. Pure,
//! stateless, order-independent.

use crate::verdict::entities::QuestionVerdict;
use serde::{Deserialize, Serialize};

/// Overall classification of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionReading {
    /// At least half the answers looked suspicious
    MostlyLying,
    /// Suspicious ratio in [0.3, 0.5)
    Mixed,
    /// Suspicious ratio below 0.3
    MostlyTruthful,
    /// No verdicts to judge
    Inconclusive,
}

impl SessionReading {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionReading::MostlyLying => "mostly lying",
            SessionReading::Mixed => "mixed",
            SessionReading::MostlyTruthful => "mostly truthful",
            SessionReading::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for SessionReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate of one session's verdicts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub suspicious: usize,
    pub suspicious_ratio: f64,
    pub reading: SessionReading,
}

impl SessionSummary {
    pub fn from_verdicts(verdicts: &[QuestionVerdict]) -> Self {
        let total = verdicts.len();
        let suspicious = verdicts.iter().filter(|v| v.is_suspicious).count();
        if total == 0 {
            return Self {
                total,
                suspicious,
                suspicious_ratio: 0.0,
                reading: SessionReading::Inconclusive,
            };
        }

        let suspicious_ratio = suspicious as f64 / total as f64;
        let reading = if suspicious_ratio >= 0.5 {
            SessionReading::MostlyLying
        } else if suspicious_ratio >= 0.3 {
            SessionReading::Mixed
        } else {
            SessionReading::MostlyTruthful
        };

        Self {
            total,
            suspicious,
            suspicious_ratio,
            reading,
        }
    }
}
