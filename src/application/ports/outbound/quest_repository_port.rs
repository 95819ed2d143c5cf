use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepoError;
use crate::domain::entities::{Achievement, AchievementDefinition, Quest};
use crate::domain::value_objects::{AchievementId, PlayerId, QuestType};

/// Storage for quests and achievements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestRepositoryPort: Send + Sync {
    /// Insert the quest unless the player already has one with the same id.
    /// Returns whether a row was created.
    async fn add_quest(&self, player_id: PlayerId, quest: &Quest) -> Result<bool, RepoError>;

    /// Advance every active quest of `quest_type`.
    /// Returns the number of quests completed by this call.
    async fn update_quest_progress(
        &self,
        player_id: PlayerId,
        quest_type: QuestType,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<u32, RepoError>;

    /// Quests that are neither completed nor expired at `now`
    async fn get_active_quests(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<Vec<Quest>, RepoError>;
    async fn count_completed_quests(&self, player_id: PlayerId) -> Result<u32, RepoError>;

    /// Create the achievements the player does not have yet.
    /// Returns the number created.
    async fn seed_achievements(
        &self,
        player_id: PlayerId,
        catalog: &[AchievementDefinition],
    ) -> Result<u32, RepoError>;

    /// Advance one achievement. Returns whether this call completed it.
    async fn update_achievement_progress(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, RepoError>;

    async fn get_player_achievements(&self, player_id: PlayerId) -> Result<Vec<Achievement>, RepoError>;
}
