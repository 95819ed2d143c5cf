//! Timing accuracy categories supplied with each input

use serde::{Deserialize, Serialize};

/// How closely an input matched a note's intended timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingAccuracy {
    Perfect,
    Good,
    Bad,
}

impl TimingAccuracy {
    /// Points awarded for a correct hit at this accuracy, before the combo multiplier
    pub fn base_points(&self) -> u32 {
        match self {
            Self::Perfect => 100,
            Self::Good => 50,
            Self::Bad => 10,
        }
    }

    /// Whether a correct hit at this accuracy extends the combo
    pub fn keeps_combo(&self) -> bool {
        matches!(self, Self::Perfect | Self::Good)
    }

    /// Classify an absolute timing offset in seconds
    pub fn from_offset(offset_secs: f64) -> Self {
        let offset = offset_secs.abs();
        if offset <= 0.1 {
            Self::Perfect
        } else if offset <= 0.3 {
            Self::Good
        } else {
            Self::Bad
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_classification() {
        assert_eq!(TimingAccuracy::from_offset(0.0), TimingAccuracy::Perfect);
        assert_eq!(TimingAccuracy::from_offset(0.1), TimingAccuracy::Perfect);
        assert_eq!(TimingAccuracy::from_offset(-0.25), TimingAccuracy::Good);
        assert_eq!(TimingAccuracy::from_offset(0.3), TimingAccuracy::Good);
        assert_eq!(TimingAccuracy::from_offset(0.31), TimingAccuracy::Bad);
    }

    #[test]
    fn test_base_points() {
        assert_eq!(TimingAccuracy::Perfect.base_points(), 100);
        assert_eq!(TimingAccuracy::Good.base_points(), 50);
        assert_eq!(TimingAccuracy::Bad.base_points(), 10);
        assert!(!TimingAccuracy::Bad.keeps_combo());
    }
}
