//! Achievement entity and the fixed catalog every player is seeded with

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::AchievementId;

use super::ProgressCounter;

/// Catalog entry describing one achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: &'static str,
    pub target: u32,
}

/// Every achievement a player can earn
pub fn achievement_catalog() -> Vec<AchievementDefinition> {
    AchievementId::ALL
        .into_iter()
        .map(|id| {
            let (name, target) = match id {
                AchievementId::FirstBlood => ("First Blood", 1),
                AchievementId::PicoFriend => ("Pico's Friend", 50),
                AchievementId::StoryMaster => ("Story Master", 4),
                AchievementId::Perfectionist => ("Perfectionist", 50),
                AchievementId::ComboMaster => ("Combo Master", 100),
                AchievementId::BossSlayer => ("Boss Slayer", 5),
                AchievementId::NoteCollector => ("Note Collector", 1000),
                AchievementId::RichPlayer => ("Rich Player", 10000),
                AchievementId::Popular => ("Popular", 20),
                AchievementId::Legendary => ("Legendary", 50),
            };
            AchievementDefinition { id, name, target }
        })
        .collect()
}

/// A player's standing on one achievement. Achievements never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub counter: ProgressCounter,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn from_definition(definition: &AchievementDefinition) -> Self {
        Self {
            id: definition.id,
            name: definition.name.to_string(),
            counter: ProgressCounter::new(definition.target),
            completed_at: None,
        }
    }

    /// Advance progress, stamping the completion time on the completing call
    pub fn advance(&mut self, amount: u32, now: DateTime<Utc>) -> bool {
        let completed = self.counter.advance(amount);
        if completed {
            self.completed_at = Some(now);
        }
        completed
    }

    pub fn is_completed(&self) -> bool {
        self.counter.completed
    }
}
