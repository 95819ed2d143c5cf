//! Tags used to route progress to quests, achievements and story relationships

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownTag {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Category of a daily quest; progress is routed by this tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Battle,
    Social,
    Exploration,
    Collection,
    Skill,
}

impl QuestType {
    pub const ALL: [QuestType; 5] = [
        QuestType::Battle,
        QuestType::Social,
        QuestType::Exploration,
        QuestType::Collection,
        QuestType::Skill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Battle => "battle",
            Self::Social => "social",
            Self::Exploration => "exploration",
            Self::Collection => "collection",
            Self::Skill => "skill",
        }
    }

    /// Prefix of the date-derived daily quest identifier
    pub fn daily_prefix(&self) -> &'static str {
        match self {
            Self::Battle => "daily_battle",
            Self::Social => "daily_social",
            Self::Exploration => "daily_explore",
            Self::Collection => "daily_collect",
            Self::Skill => "daily_skill",
        }
    }

    /// Inclusive range the daily target is drawn from
    pub fn daily_target_range(&self) -> (u32, u32) {
        match self {
            Self::Battle => (5, 10),
            Self::Social => (3, 6),
            Self::Exploration => (4, 8),
            Self::Collection => (10, 20),
            Self::Skill => (1, 3),
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag::new("quest type", s))
    }
}

/// Identifier of an entry in the fixed achievement catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstBlood,
    PicoFriend,
    StoryMaster,
    Perfectionist,
    ComboMaster,
    BossSlayer,
    NoteCollector,
    RichPlayer,
    Popular,
    Legendary,
}

impl AchievementId {
    pub const ALL: [AchievementId; 10] = [
        AchievementId::FirstBlood,
        AchievementId::PicoFriend,
        AchievementId::StoryMaster,
        AchievementId::Perfectionist,
        AchievementId::ComboMaster,
        AchievementId::BossSlayer,
        AchievementId::NoteCollector,
        AchievementId::RichPlayer,
        AchievementId::Popular,
        AchievementId::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstBlood => "first_blood",
            Self::PicoFriend => "pico_friend",
            Self::StoryMaster => "story_master",
            Self::Perfectionist => "perfectionist",
            Self::ComboMaster => "combo_master",
            Self::BossSlayer => "boss_slayer",
            Self::NoteCollector => "note_collector",
            Self::RichPlayer => "rich_player",
            Self::Popular => "popular",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownTag::new("achievement", s))
    }
}

/// Story characters the player keeps a relationship counter with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryCharacter {
    Pico,
    Boyfriend,
}

impl StoryCharacter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pico => "pico",
            Self::Boyfriend => "boyfriend",
        }
    }
}

impl fmt::Display for StoryCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back_from_storage_names() {
        for quest_type in QuestType::ALL {
            assert_eq!(quest_type.as_str().parse::<QuestType>(), Ok(quest_type));
        }
        for achievement in AchievementId::ALL {
            assert_eq!(achievement.as_str().parse::<AchievementId>(), Ok(achievement));
        }
        assert!("dancing".parse::<QuestType>().is_err());
    }

    #[test]
    fn test_daily_target_ranges_are_ordered() {
        for quest_type in QuestType::ALL {
            let (min, max) = quest_type.daily_target_range();
            assert!(min >= 1 && min <= max, "{quest_type}");
        }
        assert_eq!(QuestType::Battle.daily_target_range(), (5, 10));
    }
}
