//! Directional inputs and the per-note arrow sets built from them

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four directional inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

impl Arrow {
    /// The full input alphabet, in display order
    pub const ALL: [Arrow; 4] = [Arrow::Left, Arrow::Right, Arrow::Up, Arrow::Down];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Left => "←",
            Self::Right => "→",
            Self::Up => "↑",
            Self::Down => "↓",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown arrow: {0}")]
pub struct UnknownArrow(pub String);

impl FromStr for Arrow {
    type Err = UnknownArrow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "←" => Ok(Self::Left),
            "right" | "→" => Ok(Self::Right),
            "up" | "↑" => Ok(Self::Up),
            "down" | "↓" => Ok(Self::Down),
            other => Err(UnknownArrow(other.to_string())),
        }
    }
}

/// An unordered set of arrows pressed together.
///
/// Equality is set equality: order is irrelevant and duplicates collapse,
/// which is exactly the rule used to judge an input against a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrowSet(BTreeSet<Arrow>);

impl ArrowSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn single(arrow: Arrow) -> Self {
        Self(BTreeSet::from([arrow]))
    }

    pub fn insert(&mut self, arrow: Arrow) -> bool {
        self.0.insert(arrow)
    }

    pub fn contains(&self, arrow: Arrow) -> bool {
        self.0.contains(&arrow)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Arrow> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Arrow> for ArrowSet {
    fn from_iter<I: IntoIterator<Item = Arrow>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[Arrow]> for ArrowSet {
    fn from(arrows: &[Arrow]) -> Self {
        arrows.iter().copied().collect()
    }
}

impl fmt::Display for ArrowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.0.iter().map(Arrow::symbol).collect();
        f.write_str(&symbols.join(" "))
    }
}
