//! Song difficulty tiers

use serde::{Deserialize, Serialize};

/// Difficulty tier of a song, 1 (easiest) through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifficultyTier(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Difficulty tier must be between {min} and {max}, got {0}", min = DifficultyTier::MIN, max = DifficultyTier::MAX)]
pub struct InvalidDifficulty(pub u8);

impl DifficultyTier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const EASIEST: Self = Self(Self::MIN);

    pub fn new(value: u8) -> Result<Self, InvalidDifficulty> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidDifficulty(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Largest number of simultaneous arrows a note of this tier may require
    pub fn max_chord(&self) -> usize {
        match self.0 {
            1 => 1,
            2 => 2,
            3 => 3,
            n => usize::from(n).min(4),
        }
    }
}

impl TryFrom<u8> for DifficultyTier {
    type Error = InvalidDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DifficultyTier> for u8 {
    fn from(tier: DifficultyTier) -> u8 {
        tier.0
    }
}
