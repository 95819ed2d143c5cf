//! Pattern generator - builds the note sequence for a battle
//!
//! Structure is deterministic (one note per slot, chord size bounded by the
//! difficulty tier); content comes from the supplied roll function so the
//! caller decides where randomness comes from.

use crate::domain::entities::NoteEvent;
use crate::domain::value_objects::{Arrow, ArrowSet, DifficultyTier};

/// Generate `note_count` notes for a song of the given tier.
///
/// `roll(min, max)` must return a value in the inclusive range `min..=max`;
/// out-of-range values are clamped.
pub fn generate_pattern<R>(note_count: usize, tier: DifficultyTier, mut roll: R) -> Vec<NoteEvent>
where
    R: FnMut(u32, u32) -> u32,
{
    (0..note_count)
        .map(|index| {
            let chord = chord_size(tier, &mut roll);
            NoteEvent::new(index, draw_arrows(chord, &mut roll))
        })
        .collect()
}

/// Number of simultaneous arrows for one note
fn chord_size<R>(tier: DifficultyTier, roll: &mut R) -> usize
where
    R: FnMut(u32, u32) -> u32,
{
    match tier.value() {
        1 => 1,
        2 => {
            if roll(1, 100).clamp(1, 100) <= 20 {
                2
            } else {
                1
            }
        }
        3 => match roll(1, 100).clamp(1, 100) {
            1..=10 => 3,
            11..=40 => 2,
            _ => 1,
        },
        _ => {
            let max = tier.max_chord() as u32;
            roll(1, max).clamp(1, max) as usize
        }
    }
}

/// Draw `count` distinct arrows with a partial Fisher-Yates shuffle
fn draw_arrows<R>(count: usize, roll: &mut R) -> ArrowSet
where
    R: FnMut(u32, u32) -> u32,
{
    let mut pool = Arrow::ALL;
    let last = (pool.len() - 1) as u32;
    let count = count.clamp(1, pool.len());

    for i in 0..count {
        let j = roll(i as u32, last).clamp(i as u32, last) as usize;
        pool.swap(i, j);
    }

    pool[..count].iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn tier(value: u8) -> DifficultyTier {
        DifficultyTier::new(value).expect("valid tier")
    }

    fn seeded(seed: u64) -> impl FnMut(u32, u32) -> u32 {
        let mut rng = StdRng::seed_from_u64(seed);
        move |min, max| rng.gen_range(min..=max)
    }

    #[test]
    fn test_length_matches_note_count() {
        for value in DifficultyTier::MIN..=DifficultyTier::MAX {
            let notes = generate_pattern(37, tier(value), seeded(7));
            assert_eq!(notes.len(), 37);
            for (i, note) in notes.iter().enumerate() {
                assert_eq!(note.index, i);
            }
        }
    }

    #[test]
    fn test_chord_size_respects_tier() {
        for value in DifficultyTier::MIN..=DifficultyTier::MAX {
            let t = tier(value);
            for note in generate_pattern(500, t, seeded(value as u64)) {
                assert!(!note.arrows.is_empty());
                assert!(note.arrows.len() <= t.max_chord());
            }
        }
    }

    #[test]
    fn test_tier_one_is_always_single() {
        let notes = generate_pattern(200, tier(1), seeded(3));
        assert!(notes.iter().all(|n| n.arrows.len() == 1));
    }

    #[test]
    fn test_tier_two_distribution_thresholds() {
        // 20 → double, 21 → single; arrow draws use the low end
        let mut rolls = vec![20, 0, 1, 21, 0].into_iter();
        let notes = generate_pattern(2, tier(2), move |min, _| rolls.next().unwrap_or(min));
        assert_eq!(notes[0].arrows.len(), 2);
        assert_eq!(notes[1].arrows.len(), 1);
    }

    #[test]
    fn test_tier_three_distribution_thresholds() {
        let mut rolls = vec![10, 0, 1, 2, 40, 0, 1, 41, 0].into_iter();
        let notes = generate_pattern(3, tier(3), move |min, _| rolls.next().unwrap_or(min));
        assert_eq!(notes[0].arrows.len(), 3);
        assert_eq!(notes[1].arrows.len(), 2);
        assert_eq!(notes[2].arrows.len(), 1);
    }

    #[test]
    fn test_arrows_are_distinct_even_with_degenerate_rolls() {
        // A roll function that always returns the maximum still yields distinct arrows
        let notes = generate_pattern(50, tier(5), |_, max| max);
        for note in notes {
            assert_eq!(note.arrows.len(), 4);
            for arrow in Arrow::ALL {
                assert!(note.arrows.contains(arrow));
            }
        }
    }

    #[test]
    fn test_zero_notes() {
        assert!(generate_pattern(0, tier(3), seeded(1)).is_empty());
    }
}
