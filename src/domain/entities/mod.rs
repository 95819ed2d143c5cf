//! Domain entities - Core business objects with identity

mod achievement;
mod battle;
mod inventory;
mod player;
mod progress;
mod quest;
mod song;

pub use achievement::{achievement_catalog, Achievement, AchievementDefinition};
pub use battle::{
    BattleError, BattleSession, BattleState, NoteEvent, NoteJudgement, NoteResult,
    NOTE_SPACING_SECS,
};
pub use inventory::{starter_items, InventoryItem};
pub use player::{Player, PlayerStats, SkillAttributes, StoryProgress};
pub use progress::ProgressCounter;
pub use quest::Quest;
pub use song::{CatalogError, Song, SongCatalog};
