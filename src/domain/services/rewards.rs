//! Reward formulas for battles and story choices

use serde::Serialize;

use crate::domain::value_objects::StoryCharacter;

pub const BASE_BATTLE_EXP: u32 = 50;
pub const BASE_BATTLE_MONEY: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub exp: u32,
    pub money: u32,
}

/// Experience and money earned by a battle
pub fn battle_reward(score: u64, max_combo: u32, perfect_hits: u32) -> Reward {
    let exp_bonus = score / 1000 + u64::from(max_combo / 10) + u64::from(perfect_hits) * 2;
    let money_bonus = score / 2000 + u64::from(max_combo / 20) + u64::from(perfect_hits);

    Reward {
        exp: saturating_u32(u64::from(BASE_BATTLE_EXP) + exp_bonus),
        money: saturating_u32(u64::from(BASE_BATTLE_MONEY) + money_bonus),
    }
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Fixed payout for one narrative choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryChoiceReward {
    pub reward: Reward,
    /// Relationship changes, applied in order
    pub relationships: Vec<(StoryCharacter, i32)>,
    /// Relationship gain reported back to the player
    pub reported_relationship: i32,
}

/// Reward for a story choice; unknown choices give nothing
pub fn story_choice_reward(choice_id: &str) -> StoryChoiceReward {
    let (exp, money, relationships) = match choice_id {
        "ask_pico_past" => (25, 0, vec![(StoryCharacter::Pico, 10)]),
        "help_pico" => (
            50,
            100,
            vec![(StoryCharacter::Pico, 15), (StoryCharacter::Boyfriend, 5)],
        ),
        "challenge_battle" => (75, 0, vec![(StoryCharacter::Pico, 20)]),
        _ => (0, 0, Vec::new()),
    };

    let reported_relationship = relationships
        .iter()
        .find(|(character, _)| *character == StoryCharacter::Pico)
        .map(|(_, amount)| *amount)
        .unwrap_or(0);

    StoryChoiceReward {
        reward: Reward { exp, money },
        relationships,
        reported_relationship,
    }
}
