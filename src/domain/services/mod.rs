//! Domain services - pure game rules with no I/O

pub mod energy;
pub mod pattern;
pub mod rewards;
pub mod scoring;

pub use energy::{available_energy, regen_ticks, DEFAULT_ENERGY_COOLDOWN_SECS};
pub use pattern::generate_pattern;
pub use rewards::{battle_reward, story_choice_reward, Reward, StoryChoiceReward};
pub use scoring::{round_one_decimal, summarize, BattleSummary};
