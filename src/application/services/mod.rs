//! Application services - Use case implementations
//!
//! Each service takes its collaborators as port trait objects and returns
//! domain entities or serializable views.

mod battle_service;
mod energy_service;
mod error;
mod player_service;
mod progression_service;
mod quest_service;

pub use battle_service::{BattleCompletion, BattleService, BattleView, InputOutcome};
pub use energy_service::EnergyService;
pub use error::EngineError;
pub use player_service::{
    AchievementOverview, InventoryOverview, PlayTime, PlayerProfile, PlayerProgress,
    PlayerService, QuestOverview,
};
pub use progression_service::{ProgressionService, RewardOutcome, SceneData, StoryOutcome};
pub use quest_service::QuestService;
