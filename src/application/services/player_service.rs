//! Player service - registration, profiles and the progress overview

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::ports::outbound::{ClockPort, PlayerRepositoryPort};
use crate::application::services::{EnergyService, EngineError, QuestService};
use crate::domain::entities::{
    starter_items, Achievement, InventoryItem, Player, PlayerStats, Quest, StoryProgress,
};
use crate::domain::services::round_one_decimal;
use crate::domain::value_objects::PlayerId;

/// Minutes of authored main-story content
pub const MAIN_STORY_MINUTES: u32 = 180;
/// Minutes of authored side-quest content
pub const SIDE_QUEST_MINUTES: u32 = 60;

/// Player with energy regeneration applied
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub player: Player,
    pub available_energy: u32,
    pub story: StoryProgress,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryOverview {
    pub items: Vec<InventoryItem>,
    pub total_items: u32,
}

impl InventoryOverview {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        let total_items = items.iter().map(|item| item.quantity).sum();
        Self { items, total_items }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementOverview {
    pub total: usize,
    pub completed: usize,
    /// Percentage, one decimal place
    pub completion_percentage: f64,
    pub list: Vec<Achievement>,
}

impl AchievementOverview {
    pub fn new(list: Vec<Achievement>) -> Self {
        let total = list.len();
        let completed = list.iter().filter(|a| a.is_completed()).count();
        let completion_percentage = if total == 0 {
            0.0
        } else {
            round_one_decimal(completed as f64 / total as f64 * 100.0)
        };
        Self {
            total,
            completed,
            completion_percentage,
            list,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestOverview {
    pub active: Vec<Quest>,
    pub active_count: usize,
    pub completed: u32,
}

/// Estimated play time in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayTime {
    pub main_story: u32,
    pub side_quests: u32,
    /// Time spent in completed battles
    pub endgame: u32,
    pub total: u32,
}

impl PlayTime {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        let endgame = (stats.total_play_secs.max(0.0) / 60.0).floor() as u32;
        Self {
            main_story: MAIN_STORY_MINUTES,
            side_quests: SIDE_QUEST_MINUTES,
            endgame,
            total: MAIN_STORY_MINUTES + SIDE_QUEST_MINUTES + endgame,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerProgress {
    pub player: Player,
    pub available_energy: u32,
    pub story: StoryProgress,
    pub stats: PlayerStats,
    pub achievements: AchievementOverview,
    pub quests: QuestOverview,
    pub inventory: InventoryOverview,
    pub play_time: PlayTime,
}

pub struct PlayerService {
    players: Arc<dyn PlayerRepositoryPort>,
    quests: Arc<QuestService>,
    energy: Arc<EnergyService>,
    clock: Arc<dyn ClockPort>,
}

impl PlayerService {
    pub fn new(
        players: Arc<dyn PlayerRepositoryPort>,
        quests: Arc<QuestService>,
        energy: Arc<EnergyService>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            players,
            quests,
            energy,
            clock,
        }
    }

    /// Look a player up by chat identity, registering them on first contact
    #[instrument(skip(self))]
    pub async fn get_or_create_player(
        &self,
        external_id: i64,
        username: Option<String>,
        display_name: &str,
    ) -> Result<Player, EngineError> {
        if let Some(player) = self.players.get_player_by_external_id(external_id).await? {
            // Repairs a registration interrupted between the player row and seeding
            let created = self.quests.seed_achievements(player.id).await?;
            if created > 0 {
                warn!(player_id = %player.id, created, "Seeded missing achievements");
            }
            return Ok(player);
        }

        let player = Player::new(external_id, username, display_name, self.clock.now());
        self.players.create_player(&player, &starter_items()).await?;
        self.quests.seed_achievements(player.id).await?;

        info!(player_id = %player.id, external_id, "Player registered");
        Ok(player)
    }

    pub async fn get_player(&self, player_id: PlayerId) -> Result<Player, EngineError> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Player", player_id))
    }

    pub async fn profile(&self, player_id: PlayerId) -> Result<PlayerProfile, EngineError> {
        let player = self.get_player(player_id).await?;
        let available_energy = self.energy.available_for(&player);
        let story = self.players.get_story_progress(player_id).await?;
        let stats = self.players.get_stats(player_id).await?;

        Ok(PlayerProfile {
            player,
            available_energy,
            story,
            stats,
        })
    }

    pub async fn inventory(&self, player_id: PlayerId) -> Result<InventoryOverview, EngineError> {
        self.get_player(player_id).await?;
        let items = self.players.get_inventory(player_id).await?;
        Ok(InventoryOverview::new(items))
    }

    /// Everything the player has achieved so far, in one read
    #[instrument(skip(self))]
    pub async fn progress(&self, player_id: PlayerId) -> Result<PlayerProgress, EngineError> {
        let PlayerProfile {
            player,
            available_energy,
            story,
            stats,
        } = self.profile(player_id).await?;

        let achievements = AchievementOverview::new(self.quests.achievements(player_id).await?);
        let active = self.quests.active_quests(player_id).await?;
        let quests = QuestOverview {
            active_count: active.len(),
            active,
            completed: self.quests.completed_quest_count(player_id).await?,
        };
        let inventory = InventoryOverview::new(self.players.get_inventory(player_id).await?);
        let play_time = PlayTime::from_stats(&stats);

        Ok(PlayerProgress {
            player,
            available_energy,
            story,
            stats,
            achievements,
            quests,
            inventory,
            play_time,
        })
    }
}
