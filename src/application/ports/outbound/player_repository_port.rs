use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepoError;
use crate::domain::entities::{InventoryItem, Player, PlayerStats, StoryProgress};
use crate::domain::value_objects::{PlayerId, StoryCharacter};

/// Storage for players and the rows that hang off them
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepositoryPort: Send + Sync {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    async fn get_player_by_external_id(&self, external_id: i64) -> Result<Option<Player>, RepoError>;

    /// Insert the player with empty story progress, zeroed stats and the given items
    async fn create_player(&self, player: &Player, starter_items: &[InventoryItem]) -> Result<(), RepoError>;

    /// Store a new energy value and stamp it with `updated_at`
    async fn update_energy(&self, id: PlayerId, energy: u32, updated_at: DateTime<Utc>) -> Result<(), RepoError>;
    async fn add_experience(&self, id: PlayerId, amount: u32) -> Result<(), RepoError>;
    /// Credit money; also counted in the lifetime `money_earned` stat
    async fn add_money(&self, id: PlayerId, amount: u32) -> Result<(), RepoError>;
    async fn update_level(&self, id: PlayerId, level: u32, max_health: u32, max_energy: u32) -> Result<(), RepoError>;
    async fn update_relationship(&self, id: PlayerId, character: StoryCharacter, amount: i32) -> Result<(), RepoError>;

    async fn get_story_progress(&self, id: PlayerId) -> Result<StoryProgress, RepoError>;
    async fn get_stats(&self, id: PlayerId) -> Result<PlayerStats, RepoError>;
    async fn get_inventory(&self, id: PlayerId) -> Result<Vec<InventoryItem>, RepoError>;
}
