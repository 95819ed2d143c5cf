//! Progress counters shared by quests and achievements

use serde::{Deserialize, Serialize};

/// Monotonic counter compared against a fixed target.
///
/// Completion happens at most once: once `completed` is set the counter
/// ignores further advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounter {
    pub progress: u32,
    pub target: u32,
    pub completed: bool,
}

impl ProgressCounter {
    pub fn new(target: u32) -> Self {
        Self {
            progress: 0,
            target,
            completed: false,
        }
    }

    /// Add `amount` and report whether this call completed the counter
    pub fn advance(&mut self, amount: u32) -> bool {
        if self.completed {
            return false;
        }
        self.progress = self.progress.saturating_add(amount);
        if self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_exactly_once() {
        let mut counter = ProgressCounter::new(3);
        assert!(!counter.advance(2));
        assert!(counter.advance(1));
        assert!(counter.completed);

        let frozen = counter;
        assert!(!counter.advance(5));
        assert_eq!(counter, frozen);
    }

    #[test]
    fn test_overshoot_completes() {
        let mut counter = ProgressCounter::new(10);
        assert!(counter.advance(25));
        assert_eq!(counter.progress, 25);
    }
}
