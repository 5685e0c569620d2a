//! Console output: per-question progress and session result formatting

use bluff_application::{SessionOutcome, SessionProgress};
use bluff_domain::{CalibrationData, QuestionVerdict, SessionReading};
use colored::Colorize;

/// Prints question progress and verdicts as a session runs.
pub struct ConsoleReporter;

impl SessionProgress for ConsoleReporter {
    fn on_question_start(&self, index: usize, total: usize) {
        println!(
            "{}",
            format!("--- Question {}/{} ---", index + 1, total).bold()
        );
    }

    fn on_question_retry(&self, reason: &str) {
        println!("{} {}", "retrying:".yellow(), reason);
    }

    fn on_verdict(&self, verdict: &QuestionVerdict) {
        let score = format!("{:.0}%", verdict.confidence * 100.0);
        let line = if verdict.is_suspicious {
            format!("suspicious ({score})").red().bold()
        } else {
            format!("looks honest ({score})").green()
        };
        println!("  {} - {}", line, verdict.factors.join(", ").dimmed());
    }

    fn on_calibration_complete(&self, data: &CalibrationData) {
        println!(
            "{} {} responses, face confidence {:.0}%",
            "calibrated:".cyan().bold(),
            data.sample_count,
            data.average_face_confidence * 100.0
        );
    }
}

/// Format the final session outcome as colored text.
pub fn format_session(player: &str, outcome: &SessionOutcome) -> String {
    let summary = &outcome.summary;
    let reading = match summary.reading {
        SessionReading::MostlyLying => summary.reading.as_str().red().bold(),
        SessionReading::Mixed => summary.reading.as_str().yellow().bold(),
        SessionReading::MostlyTruthful => summary.reading.as_str().green().bold(),
        SessionReading::Inconclusive => summary.reading.as_str().dimmed(),
    };
    format!(
        "{}: {} ({}/{} suspicious, ratio {:.2})",
        player.bold(),
        reading,
        summary.suspicious,
        summary.total,
        summary.suspicious_ratio
    )
}

/// Format the final session outcome as a JSON document.
pub fn format_session_json(player: &str, outcome: &SessionOutcome) -> String {
    serde_json::json!({
        "player": player,
        "verdicts": outcome.verdicts,
        "summary": outcome.summary,
    })
    .to_string()
}
