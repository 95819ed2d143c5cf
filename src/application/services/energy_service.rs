//! Energy service - lazy regeneration and spending against the player store

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

use crate::application::ports::outbound::{ClockPort, PlayerRepositoryPort};
use crate::application::services::EngineError;
use crate::domain::entities::Player;
use crate::domain::services::{available_energy, regen_ticks};
use crate::domain::value_objects::PlayerId;

pub struct EnergyService {
    players: Arc<dyn PlayerRepositoryPort>,
    clock: Arc<dyn ClockPort>,
    cooldown: Duration,
}

impl EnergyService {
    pub fn new(
        players: Arc<dyn PlayerRepositoryPort>,
        clock: Arc<dyn ClockPort>,
        cooldown: Duration,
    ) -> Self {
        Self {
            players,
            clock,
            cooldown,
        }
    }

    /// Energy the player has right now, without touching storage
    pub fn available_for(&self, player: &Player) -> u32 {
        available_energy(
            player.energy,
            player.max_energy,
            player.last_energy_update,
            self.clock.now(),
            self.cooldown,
        )
    }

    /// Recompute regeneration and persist it if at least one point was gained
    #[instrument(skip(self))]
    pub async fn check_energy(&self, player_id: PlayerId) -> Result<u32, EngineError> {
        let player = self.load(player_id).await?;
        self.refresh(&player, self.clock.now()).await
    }

    /// Spend `amount` energy. Returns what is left.
    ///
    /// The stored timestamp is re-stamped on every successful debit, which
    /// drops any partial progress toward the next regeneration tick.
    #[instrument(skip(self))]
    pub async fn use_energy(&self, player_id: PlayerId, amount: u32) -> Result<u32, EngineError> {
        let player = self.load(player_id).await?;
        let now = self.clock.now();
        let available = self.refresh(&player, now).await?;

        if amount > available {
            debug!(player_id = %player_id, amount, available, "Energy debit refused");
            return Err(EngineError::InsufficientResource {
                required: amount,
                available,
            });
        }

        let remaining = available - amount;
        self.players.update_energy(player_id, remaining, now).await?;
        debug!(player_id = %player_id, amount, remaining, "Energy spent");
        Ok(remaining)
    }

    async fn refresh(&self, player: &Player, now: DateTime<Utc>) -> Result<u32, EngineError> {
        if player.energy >= player.max_energy {
            return Ok(player.energy);
        }

        let ticks = regen_ticks(player.last_energy_update, now, self.cooldown);
        if ticks == 0 {
            return Ok(player.energy);
        }

        let energy = available_energy(
            player.energy,
            player.max_energy,
            player.last_energy_update,
            now,
            self.cooldown,
        );
        self.players.update_energy(player.id, energy, now).await?;
        debug!(player_id = %player.id, from = player.energy, to = energy, "Energy regenerated");
        Ok(energy)
    }

    async fn load(&self, player_id: PlayerId) -> Result<Player, EngineError> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Player", player_id))
    }
}
