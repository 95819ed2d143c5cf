//! Letter grades for completed battles

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade ladder, evaluated top-down. Lower bounds are inclusive.
    pub fn from_ratios(accuracy: f64, perfect_percentage: f64) -> Self {
        if accuracy >= 90.0 {
            if perfect_percentage >= 80.0 {
                Self::S
            } else {
                Self::A
            }
        } else if accuracy >= 80.0 {
            Self::B
        } else if accuracy >= 70.0 {
            Self::C
        } else if accuracy >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_map_to_higher_tier() {
        assert_eq!(Grade::from_ratios(90.0, 80.0), Grade::S);
        assert_eq!(Grade::from_ratios(90.0, 79.9), Grade::A);
        assert_eq!(Grade::from_ratios(80.0, 100.0), Grade::B);
        assert_eq!(Grade::from_ratios(70.0, 0.0), Grade::C);
        assert_eq!(Grade::from_ratios(60.0, 0.0), Grade::D);
        assert_eq!(Grade::from_ratios(59.9, 59.9), Grade::F);
    }

    #[test]
    fn test_perfect_ratio_only_matters_at_the_top() {
        assert_eq!(Grade::from_ratios(85.0, 100.0), Grade::B);
        assert_eq!(Grade::from_ratios(100.0, 100.0), Grade::S);
    }
}
