//! Player entity - level, currencies, energy and story standing
//!
//! Players are created on first interaction and never deleted. Experience
//! and level only ever grow; energy stays within `0..=max_energy`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PlayerId;

pub const STARTING_HEALTH: u32 = 100;
pub const STARTING_ENERGY: u32 = 100;
pub const STARTING_MONEY: u32 = 100;

/// Max health gained per level
pub const HEALTH_PER_LEVEL: u32 = 10;
/// Max energy gained per level
pub const ENERGY_PER_LEVEL: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Identifier of the user in the chat platform
    pub external_id: i64,
    pub username: Option<String>,
    pub display_name: String,
    pub level: u32,
    pub exp: u32,
    pub money: u32,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub last_energy_update: DateTime<Utc>,
    pub skills: SkillAttributes,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(
        external_id: i64,
        username: Option<String>,
        display_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PlayerId::new(),
            external_id,
            username,
            display_name: display_name.into(),
            level: 1,
            exp: 0,
            money: STARTING_MONEY,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            energy: STARTING_ENERGY,
            max_energy: STARTING_ENERGY,
            last_energy_update: now,
            skills: SkillAttributes::default(),
            created_at: now,
        }
    }

    /// Experience required to leave the current level
    pub fn level_threshold(&self) -> u64 {
        u64::from(self.level) * u64::from(self.level) * 100
    }

    /// Apply every level-up the current experience allows.
    ///
    /// Each step grants +10 max health and +5 max energy; current health and
    /// energy are left alone. Returns the new level if at least one step
    /// happened.
    pub fn apply_level_ups(&mut self) -> Option<u32> {
        let starting_level = self.level;
        while u64::from(self.exp) >= self.level_threshold() {
            self.level += 1;
            self.max_health = self.max_health.saturating_add(HEALTH_PER_LEVEL);
            self.max_energy = self.max_energy.saturating_add(ENERGY_PER_LEVEL);
        }
        (self.level > starting_level).then_some(self.level)
    }
}

/// Skill attributes used by story checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAttributes {
    pub rhythm: u32,
    pub charisma: u32,
    pub strength: u32,
}

impl Default for SkillAttributes {
    fn default() -> Self {
        Self {
            rhythm: 50,
            charisma: 30,
            strength: 40,
        }
    }
}

/// Lifetime counters kept alongside the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_battles: u32,
    pub battles_won: u32,
    /// Battles finished with at least ten perfect hits
    pub perfect_scores: u32,
    pub max_combo: u32,
    pub money_earned: u32,
    /// Seconds spent in completed battles
    pub total_play_secs: f64,
}

/// Narrative position and relationship counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryProgress {
    pub chapter: u32,
    pub pico_relationship: i32,
    pub boyfriend_relationship: i32,
}

impl Default for StoryProgress {
    fn default() -> Self {
        Self {
            chapter: 1,
            pico_relationship: 0,
            boyfriend_relationship: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with_exp(exp: u32) -> Player {
        let mut player = Player::new(42, None, "Tester", Utc::now());
        player.exp = exp;
        player
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new(7, Some("bf".to_string()), "Boyfriend", Utc::now());
        assert_eq!(player.level, 1);
        assert_eq!(player.exp, 0);
        assert_eq!(player.money, 100);
        assert_eq!((player.energy, player.max_energy), (100, 100));
        assert_eq!((player.health, player.max_health), (100, 100));
        assert_eq!(player.skills.rhythm, 50);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let mut player = player_with_exp(76);
        assert_eq!(player.apply_level_ups(), None);
        assert_eq!(player.level, 1);
        assert_eq!(player.max_health, 100);
    }

    #[test]
    fn test_single_level_up() {
        let mut player = player_with_exp(106);
        assert_eq!(player.apply_level_ups(), Some(2));
        assert_eq!(player.max_health, 110);
        assert_eq!(player.max_energy, 105);
        assert_eq!(player.health, 100);
        assert_eq!(player.energy, 100);
    }

    #[test]
    fn test_multi_level_jump() {
        // thresholds: L1 100, L2 400, L3 900, L4 1600
        let mut player = player_with_exp(1000);
        assert_eq!(player.apply_level_ups(), Some(4));
        assert_eq!(player.max_health, 130);
        assert_eq!(player.max_energy, 115);
    }

    #[test]
    fn test_level_ups_stop_at_maximum_experience() {
        let mut player = player_with_exp(u32::MAX);
        // 6554² × 100 is the first threshold above u32::MAX
        assert_eq!(player.apply_level_ups(), Some(6554));
        assert_eq!(player.apply_level_ups(), None);
    }
}
