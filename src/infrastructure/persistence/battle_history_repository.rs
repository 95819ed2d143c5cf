use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{BattleHistoryRepositoryPort, BattleRecord, RepoError};
use crate::domain::value_objects::PlayerId;

/// Perfect hits a battle needs to count as a perfect score
const PERFECT_SCORE_HITS: u32 = 10;

pub struct SqliteBattleHistoryRepository {
    pool: SqlitePool,
}

impl SqliteBattleHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BattleHistoryRepositoryPort for SqliteBattleHistoryRepository {
    async fn record_battle(&self, player_id: PlayerId, record: &BattleRecord) -> Result<(), RepoError> {
        let id = player_id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("record_battle", e))?;

        // No stats row means no such player
        let perfect_score = u32::from(record.perfect_hits >= PERFECT_SCORE_HITS);
        let result = sqlx::query(
            r#"
            UPDATE player_stats
            SET total_battles = total_battles + 1,
                battles_won = battles_won + 1,
                max_combo = MAX(max_combo, ?),
                perfect_scores = perfect_scores + ?,
                total_play_secs = total_play_secs + ?
            WHERE player_id = ?
            "#,
        )
        .bind(record.max_combo)
        .bind(perfect_score)
        .bind(record.duration_secs)
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("record_battle", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Player", player_id));
        }

        sqlx::query(
            r#"
            INSERT INTO battle_history
                (player_id, song_id, score, max_combo, perfect_hits, good_hits, bad_hits, missed,
                 duration_secs, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&record.song_id)
        .bind(i64::try_from(record.score).unwrap_or(i64::MAX))
        .bind(record.max_combo)
        .bind(record.perfect_hits)
        .bind(record.good_hits)
        .bind(record.bad_hits)
        .bind(record.missed)
        .bind(record.duration_secs)
        .bind(record.recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("record_battle", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("record_battle", e))
    }
}
