//! Scoring & grading over completed battle sessions

use serde::Serialize;

use crate::domain::entities::{BattleError, BattleSession};
use crate::domain::value_objects::Grade;

/// Report produced once a battle reaches its final note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSummary {
    pub song_id: String,
    pub song_name: String,
    pub total_notes: usize,
    pub notes_judged: usize,
    pub perfect_hits: u32,
    pub good_hits: u32,
    pub bad_hits: u32,
    pub missed: u32,
    pub max_combo: u32,
    pub score: u64,
    /// Percentage, one decimal place
    pub accuracy: f64,
    /// Percentage, one decimal place
    pub perfect_percentage: f64,
    pub grade: Grade,
    pub duration_secs: f64,
}

/// Summarize a completed session. Active sessions are rejected.
pub fn summarize(session: &BattleSession) -> Result<BattleSummary, BattleError> {
    let duration_secs = session.duration_secs().ok_or(BattleError::NotComplete)?;

    let total = session.total_notes() as f64;
    let accuracy = session.current_note() as f64 / total * 100.0;
    let perfect_percentage = f64::from(session.perfect_hits()) / total * 100.0;

    Ok(BattleSummary {
        song_id: session.song_id().to_string(),
        song_name: session.song_name().to_string(),
        total_notes: session.total_notes(),
        notes_judged: session.current_note(),
        perfect_hits: session.perfect_hits(),
        good_hits: session.good_hits(),
        bad_hits: session.bad_hits(),
        missed: session.missed(),
        max_combo: session.max_combo(),
        score: session.score(),
        accuracy: round_one_decimal(accuracy),
        perfect_percentage: round_one_decimal(perfect_percentage),
        grade: Grade::from_ratios(accuracy, perfect_percentage),
        duration_secs: round_one_decimal(duration_secs),
    })
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
