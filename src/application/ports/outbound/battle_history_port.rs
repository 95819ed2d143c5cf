use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RepoError;
use crate::domain::services::BattleSummary;
use crate::domain::value_objects::PlayerId;

/// One completed battle as stored in the history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleRecord {
    pub song_id: String,
    pub score: u64,
    pub max_combo: u32,
    pub perfect_hits: u32,
    pub good_hits: u32,
    pub bad_hits: u32,
    pub missed: u32,
    pub duration_secs: f64,
    pub recorded_at: DateTime<Utc>,
}

impl BattleRecord {
    pub fn from_summary(summary: &BattleSummary, recorded_at: DateTime<Utc>) -> Self {
        Self {
            song_id: summary.song_id.clone(),
            score: summary.score,
            max_combo: summary.max_combo,
            perfect_hits: summary.perfect_hits,
            good_hits: summary.good_hits,
            bad_hits: summary.bad_hits,
            missed: summary.missed,
            duration_secs: summary.duration_secs,
            recorded_at,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BattleHistoryRepositoryPort: Send + Sync {
    /// Append to the history and fold the result into the player's stats
    async fn record_battle(&self, player_id: PlayerId, record: &BattleRecord) -> Result<(), RepoError>;
}
