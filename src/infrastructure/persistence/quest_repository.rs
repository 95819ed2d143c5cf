use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::application::ports::outbound::{QuestRepositoryPort, RepoError};
use crate::domain::entities::{Achievement, AchievementDefinition, ProgressCounter, Quest};
use crate::domain::value_objects::{AchievementId, PlayerId, QuestType};

#[derive(FromRow)]
struct QuestRow {
    quest_id: String,
    quest_type: String,
    progress: u32,
    target: u32,
    completed: bool,
    started_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<QuestRow> for Quest {
    type Error = RepoError;

    fn try_from(row: QuestRow) -> Result<Self, Self::Error> {
        Ok(Quest {
            quest_type: row
                .quest_type
                .parse()
                .map_err(|e| RepoError::serialization(format!("quest {}: {}", row.quest_id, e)))?,
            quest_id: row.quest_id,
            counter: ProgressCounter {
                progress: row.progress,
                target: row.target,
                completed: row.completed,
            },
            started_at: row.started_at,
            expires_at: row.expires_at,
        })
    }
}

#[derive(FromRow)]
struct AchievementRow {
    achievement_id: String,
    name: String,
    progress: u32,
    target: u32,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<AchievementRow> for Achievement {
    type Error = RepoError;

    fn try_from(row: AchievementRow) -> Result<Self, Self::Error> {
        Ok(Achievement {
            id: row
                .achievement_id
                .parse()
                .map_err(RepoError::serialization)?,
            name: row.name,
            counter: ProgressCounter {
                progress: row.progress,
                target: row.target,
                completed: row.completed,
            },
            completed_at: row.completed_at,
        })
    }
}

const QUEST_COLUMNS: &str =
    "quest_id, quest_type, progress, target, completed, started_at, expires_at";
const ACHIEVEMENT_COLUMNS: &str =
    "achievement_id, name, progress, target, completed, completed_at";

pub struct SqliteQuestRepository {
    pool: SqlitePool,
}

impl SqliteQuestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestRepositoryPort for SqliteQuestRepository {
    async fn add_quest(&self, player_id: PlayerId, quest: &Quest) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO active_quests
                (player_id, quest_id, quest_type, progress, target, completed, started_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(player_id.to_string())
        .bind(&quest.quest_id)
        .bind(quest.quest_type.as_str())
        .bind(quest.counter.progress)
        .bind(quest.counter.target)
        .bind(quest.counter.completed)
        .bind(quest.started_at)
        .bind(quest.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("add_quest", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_quest_progress(
        &self,
        player_id: PlayerId,
        quest_type: QuestType,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<u32, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update_quest_progress", e))?;

        let sql = format!(
            "SELECT {} FROM active_quests WHERE player_id = ? AND quest_type = ? AND completed = 0",
            QUEST_COLUMNS
        );
        let rows: Vec<QuestRow> = sqlx::query_as(&sql)
            .bind(player_id.to_string())
            .bind(quest_type.as_str())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_quest_progress", e))?;

        let mut completed = 0;
        for row in rows {
            let mut quest = Quest::try_from(row)?;
            if !quest.is_active(now) {
                continue;
            }
            if quest.advance(amount, now) {
                completed += 1;
            }

            sqlx::query(
                "UPDATE active_quests SET progress = ?, completed = ? WHERE player_id = ? AND quest_id = ?",
            )
            .bind(quest.counter.progress)
            .bind(quest.counter.completed)
            .bind(player_id.to_string())
            .bind(&quest.quest_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_quest_progress", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update_quest_progress", e))?;
        Ok(completed)
    }

    async fn get_active_quests(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<Vec<Quest>, RepoError> {
        let sql = format!(
            "SELECT {} FROM active_quests WHERE player_id = ? AND completed = 0 ORDER BY quest_id",
            QUEST_COLUMNS
        );
        let rows: Vec<QuestRow> = sqlx::query_as(&sql)
            .bind(player_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_active_quests", e))?;

        let mut quests = Vec::with_capacity(rows.len());
        for row in rows {
            let quest = Quest::try_from(row)?;
            if quest.is_active(now) {
                quests.push(quest);
            }
        }
        Ok(quests)
    }

    async fn count_completed_quests(&self, player_id: PlayerId) -> Result<u32, RepoError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM active_quests WHERE player_id = ? AND completed = 1")
                .bind(player_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::database("count_completed_quests", e))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn seed_achievements(
        &self,
        player_id: PlayerId,
        catalog: &[AchievementDefinition],
    ) -> Result<u32, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("seed_achievements", e))?;

        let mut created = 0;
        for definition in catalog {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO achievements (player_id, achievement_id, name, progress, target, completed)
                VALUES (?, ?, ?, 0, ?, 0)
                "#,
            )
            .bind(player_id.to_string())
            .bind(definition.id.as_str())
            .bind(definition.name)
            .bind(definition.target)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("seed_achievements", e))?;

            if result.rows_affected() > 0 {
                created += 1;
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("seed_achievements", e))?;
        Ok(created)
    }

    async fn update_achievement_progress(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update_achievement_progress", e))?;

        let sql = format!(
            "SELECT {} FROM achievements WHERE player_id = ? AND achievement_id = ?",
            ACHIEVEMENT_COLUMNS
        );
        let row: Option<AchievementRow> = sqlx::query_as(&sql)
            .bind(player_id.to_string())
            .bind(achievement_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_achievement_progress", e))?;

        // Players without the achievement seeded simply make no progress
        let Some(row) = row else {
            return Ok(false);
        };
        let mut achievement = Achievement::try_from(row)?;
        if achievement.is_completed() {
            return Ok(false);
        }

        let completed = achievement.advance(amount, now);
        sqlx::query(
            r#"
            UPDATE achievements SET progress = ?, completed = ?, completed_at = ?
            WHERE player_id = ? AND achievement_id = ?
            "#,
        )
        .bind(achievement.counter.progress)
        .bind(achievement.counter.completed)
        .bind(achievement.completed_at)
        .bind(player_id.to_string())
        .bind(achievement_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("update_achievement_progress", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update_achievement_progress", e))?;
        Ok(completed)
    }

    async fn get_player_achievements(&self, player_id: PlayerId) -> Result<Vec<Achievement>, RepoError> {
        let sql = format!(
            "SELECT {} FROM achievements WHERE player_id = ? ORDER BY completed DESC, progress DESC, achievement_id",
            ACHIEVEMENT_COLUMNS
        );
        let rows: Vec<AchievementRow> = sqlx::query_as(&sql)
            .bind(player_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_player_achievements", e))?;

        rows.into_iter().map(Achievement::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::application::ports::outbound::PlayerRepositoryPort;
    use crate::domain::entities::{achievement_catalog, starter_items, Player};
    use crate::infrastructure::persistence::SqliteRepository;

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 5, 9, 0, 0).unwrap()
    }

    async fn setup() -> (SqliteQuestRepository, PlayerId) {
        let sqlite = SqliteRepository::in_memory().await.unwrap();
        let player = Player::new(77, None, "Quester", morning());
        sqlite
            .players()
            .create_player(&player, &starter_items())
            .await
            .unwrap();
        (sqlite.quests(), player.id)
    }

    #[tokio::test]
    async fn test_add_quest_once_per_id() {
        let (repo, player_id) = setup().await;
        let quest = Quest::daily(QuestType::Battle, morning().date_naive(), 5, morning());

        assert!(repo.add_quest(player_id, &quest).await.unwrap());
        assert!(!repo.add_quest(player_id, &quest).await.unwrap());

        let active = repo.get_active_quests(player_id, morning()).await.unwrap();
        assert_eq!(active, vec![quest]);
    }

    #[tokio::test]
    async fn test_quest_progress_completes_once() {
        let (repo, player_id) = setup().await;
        let now = morning();
        let battle = Quest::daily(QuestType::Battle, now.date_naive(), 2, now);
        let social = Quest::daily(QuestType::Social, now.date_naive(), 3, now);
        repo.add_quest(player_id, &battle).await.unwrap();
        repo.add_quest(player_id, &social).await.unwrap();

        assert_eq!(repo.update_quest_progress(player_id, QuestType::Battle, 1, now).await.unwrap(), 0);
        assert_eq!(repo.update_quest_progress(player_id, QuestType::Battle, 1, now).await.unwrap(), 1);
        assert_eq!(repo.update_quest_progress(player_id, QuestType::Battle, 1, now).await.unwrap(), 0);

        let active = repo.get_active_quests(player_id, now).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].quest_type, QuestType::Social);
        assert_eq!(repo.count_completed_quests(player_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expired_quests_are_hidden_and_frozen() {
        let (repo, player_id) = setup().await;
        let now = morning();
        let quest = Quest::daily(QuestType::Skill, now.date_naive(), 1, now);
        repo.add_quest(player_id, &quest).await.unwrap();

        let tomorrow = now + Duration::days(1);
        assert!(repo.get_active_quests(player_id, tomorrow).await.unwrap().is_empty());
        assert_eq!(
            repo.update_quest_progress(player_id, QuestType::Skill, 5, tomorrow)
                .await
                .unwrap(),
            0
        );
        assert_eq!(repo.count_completed_quests(player_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_and_advance_achievements() {
        let (repo, player_id) = setup().await;
        let catalog = achievement_catalog();

        assert_eq!(repo.seed_achievements(player_id, &catalog).await.unwrap(), 10);
        assert_eq!(repo.seed_achievements(player_id, &catalog).await.unwrap(), 0);

        let now = morning();
        assert!(repo
            .update_achievement_progress(player_id, AchievementId::FirstBlood, 1, now)
            .await
            .unwrap());
        assert!(!repo
            .update_achievement_progress(player_id, AchievementId::FirstBlood, 1, now + Duration::hours(1))
            .await
            .unwrap());
        assert!(!repo
            .update_achievement_progress(player_id, AchievementId::ComboMaster, 40, now)
            .await
            .unwrap());

        let achievements = repo.get_player_achievements(player_id).await.unwrap();
        assert_eq!(achievements.len(), 10);

        let first = &achievements[0];
        assert_eq!(first.id, AchievementId::FirstBlood);
        assert_eq!(first.counter.progress, 1);
        assert_eq!(first.completed_at, Some(now));

        let combo = &achievements[1];
        assert_eq!(combo.id, AchievementId::ComboMaster);
        assert_eq!(combo.counter.progress, 40);
        assert!(!combo.is_completed());
    }
}
