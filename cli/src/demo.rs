//! Scripted demo: calibrates two synthetic players and runs a game
//! session for each, one behaving exactly as calibrated and one shifting
//! to a nervous profile with slower answers.

use crate::cli::{DemoArgs, OutputFormat};
use crate::output::{ConsoleReporter, format_session, format_session_json};
use anyhow::Context;
use bluff_application::{
    CalibrationInput, CalibrationStore, CaptureParams, RunCalibrationUseCase, RunSessionUseCase,
    SessionInput, SessionLogger, SpeechOutcome,
};
use bluff_domain::{PlayerId, Question, ScoringParams, SpokenAnswer};
use bluff_infrastructure::{
    FaceProfile, InMemoryCalibrationStore, ScriptedSpeechSource, SyntheticFaceSource,
    utc_now_rfc3339,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How one synthetic player behaves in the demo.
struct DemoPlayer {
    name: &'static str,
    game_profile: FaceProfile,
    game_answer_delay: Duration,
}

const NOMINAL_ANSWER_DELAY: Duration = Duration::from_millis(700);

fn calibration_questions() -> Vec<Question> {
    [
        ("Are you playing bluffcheck right now?", SpokenAnswer::Yes),
        ("Are you a cat?", SpokenAnswer::No),
        ("Are we on planet Earth?", SpokenAnswer::Yes),
        ("Is it the year 1900?", SpokenAnswer::No),
        ("Can you hear this question?", SpokenAnswer::Yes),
        ("Are you currently asleep?", SpokenAnswer::No),
        ("Is this a party game?", SpokenAnswer::Yes),
        ("Do humans have three arms?", SpokenAnswer::No),
    ]
    .into_iter()
    .map(|(prompt, expected)| Question::calibration(prompt, expected).expect("static prompt"))
    .collect()
}

fn gameplay_questions(count: usize) -> Vec<Question> {
    const BANK: [&str; 7] = [
        "Have you ever peeked at someone else's texts?",
        "Did you eat the last slice?",
        "Have you ever ghosted a group chat?",
        "Did you actually read the rules?",
        "Have you ever re-gifted a present?",
        "Is that your real laugh?",
        "Have you ever lied in this game?",
    ];
    (0..count)
        .map(|i| Question::gameplay(BANK[i % BANK.len()]).expect("static prompt"))
        .collect()
}

/// Yes/no answers alternating by question index.
fn alternating_answers(count: usize, delay: Duration) -> ScriptedSpeechSource {
    let outcomes = (0..count)
        .map(|i| {
            SpeechOutcome::Answer(if i % 2 == 0 {
                SpokenAnswer::Yes
            } else {
                SpokenAnswer::No
            })
        })
        .collect();
    ScriptedSpeechSource::with_uniform_delay(delay, outcomes)
}

/// The truthful answers matching the calibration question bank.
///
/// Answer delays vary around the gameplay delay so the duration baseline
/// gets a realistic spread instead of a degenerate zero deviation.
fn calibration_answers() -> ScriptedSpeechSource {
    const DELAYS_MS: [u64; 8] = [600, 720, 810, 650, 760, 700, 680, 740];
    let script = calibration_questions()
        .iter()
        .zip(DELAYS_MS)
        .map(|(q, ms)| {
            (
                Duration::from_millis(ms),
                SpeechOutcome::Answer(q.expected_answer().expect("calibration question")),
            )
        })
        .collect();
    ScriptedSpeechSource::new(script)
}

pub async fn run(
    args: &DemoArgs,
    params: CaptureParams,
    scoring: ScoringParams,
    logger: &dyn SessionLogger,
) -> anyhow::Result<()> {
    // Demo pacing: keep the real countdown out of a scripted run
    let params = params.with_countdown(Duration::from_millis(300));
    params.validate().context("invalid capture parameters")?;

    let store: Arc<dyn CalibrationStore> = Arc::new(InMemoryCalibrationStore::new());
    let reporter = ConsoleReporter;

    let players = [
        DemoPlayer {
            name: "alex",
            game_profile: FaceProfile::calm(),
            game_answer_delay: NOMINAL_ANSWER_DELAY,
        },
        DemoPlayer {
            name: "sam",
            game_profile: FaceProfile::nervous(),
            game_answer_delay: Duration::from_millis(1900),
        },
    ];

    let mut results = Vec::new();

    for player in &players {
        let player_id = PlayerId::new(player.name)?;
        println!();
        println!("=== Calibrating {} ===", player.name);

        // Calibration: every player answers truthfully in their calm state
        let face = Arc::new(SyntheticFaceSource::new(
            FaceProfile::calm(),
            params.nominal_sample_rate_hz,
        ));
        let speech = Arc::new(calibration_answers());
        let store_handle: Arc<dyn CalibrationStore> = Arc::clone(&store);
        let mut calibration = RunCalibrationUseCase::new(face, speech, store_handle, params);
        calibration
            .execute(
                CalibrationInput::new(player_id.clone(), calibration_questions(), utc_now_rfc3339()),
                &reporter,
                logger,
            )
            .await
            .with_context(|| format!("calibration failed for {}", player.name))?;

        println!();
        println!("=== Questioning {} ===", player.name);
        info!(
            "Running session for {} ({} questions)",
            player.name, args.questions
        );

        let face = Arc::new(SyntheticFaceSource::new(
            player.game_profile,
            params.nominal_sample_rate_hz,
        ));
        let speech = Arc::new(alternating_answers(args.questions, player.game_answer_delay));
        let store_handle: Arc<dyn CalibrationStore> = Arc::clone(&store);
        let mut session = RunSessionUseCase::new(face, speech, store_handle, params);
        let outcome = session
            .execute(
                SessionInput::new(player_id, gameplay_questions(args.questions))
                    .with_scoring(scoring),
                &reporter,
                logger,
            )
            .await
            .with_context(|| format!("session failed for {}", player.name))?;

        results.push((player.name, outcome));
    }

    println!();
    println!("=== Results ===");
    for (name, outcome) in &results {
        match args.output {
            OutputFormat::Text => println!("{}", format_session(name, outcome)),
            OutputFormat::Json => println!("{}", format_session_json(name, outcome)),
        }
    }

    Ok(())
}
