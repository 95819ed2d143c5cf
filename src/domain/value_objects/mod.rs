//! Value objects - Immutable objects defined by their attributes

mod arrow;
mod difficulty;
mod grade;
mod ids;
mod progress_tags;
mod timing;

pub use arrow::{Arrow, ArrowSet, UnknownArrow};
pub use difficulty::{DifficultyTier, InvalidDifficulty};
pub use grade::Grade;
pub use ids::*;
pub use progress_tags::{AchievementId, QuestType, StoryCharacter, UnknownTag};
pub use timing::TimingAccuracy;
