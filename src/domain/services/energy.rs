//! Energy regulator - lazy regeneration computed from a stored timestamp

use chrono::{DateTime, Duration, Utc};

/// Default regeneration interval: five minutes per point
pub const DEFAULT_ENERGY_COOLDOWN_SECS: i64 = 300;

/// Energy a player has at `now`, given the stored value and its timestamp.
///
/// Elapsed time before `last_update` counts as zero and a non-positive
/// cooldown disables regeneration.
pub fn available_energy(
    current: u32,
    max: u32,
    last_update: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> u32 {
    debug_assert!(current <= max, "stored energy above its maximum");
    current.saturating_add(regen_ticks(last_update, now, cooldown)).min(max)
}

/// Whole cooldown intervals elapsed since `last_update`
pub fn regen_ticks(last_update: DateTime<Utc>, now: DateTime<Utc>, cooldown: Duration) -> u32 {
    let cooldown_ms = cooldown.num_milliseconds();
    if cooldown_ms <= 0 {
        return 0;
    }
    let elapsed_ms = (now - last_update).num_milliseconds().max(0);
    u32::try_from(elapsed_ms / cooldown_ms).unwrap_or(u32::MAX)
}
