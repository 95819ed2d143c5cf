//! Battle service - starts battles, feeds inputs and settles completed runs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{
    BattleHistoryRepositoryPort, BattleRecord, ClockPort, PlayerRepositoryPort, RandomPort,
};
use crate::application::services::{EnergyService, EngineError, ProgressionService, RewardOutcome};
use crate::domain::entities::{BattleSession, BattleState, NoteEvent, NoteResult, SongCatalog};
use crate::domain::services::{generate_pattern, summarize, BattleSummary};
use crate::domain::value_objects::{ArrowSet, BattleId, PlayerId, TimingAccuracy};
use crate::infrastructure::battle_sessions::BattleSessionStore;

/// Snapshot of a battle in progress
#[derive(Debug, Clone, Serialize)]
pub struct BattleView {
    pub battle_id: BattleId,
    pub song_id: String,
    pub song_name: String,
    pub state: BattleState,
    pub current_note: usize,
    pub total_notes: usize,
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub next_note: Option<NoteEvent>,
    pub started_at: DateTime<Utc>,
}

impl BattleView {
    pub fn from_session(session: &BattleSession) -> Self {
        Self {
            battle_id: session.id(),
            song_id: session.song_id().to_string(),
            song_name: session.song_name().to_string(),
            state: session.state(),
            current_note: session.current_note(),
            total_notes: session.total_notes(),
            score: session.score(),
            combo: session.combo(),
            max_combo: session.max_combo(),
            next_note: session.next_note().cloned(),
            started_at: session.started_at(),
        }
    }
}

/// Summary and rewards of a finished battle
#[derive(Debug, Clone, Serialize)]
pub struct BattleCompletion {
    pub summary: BattleSummary,
    pub rewards: RewardOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputOutcome {
    pub result: NoteResult,
    pub battle: BattleView,
    /// Present on the input that judged the final note
    pub completion: Option<BattleCompletion>,
}

pub struct BattleService {
    sessions: Arc<RwLock<BattleSessionStore>>,
    catalog: Arc<SongCatalog>,
    players: Arc<dyn PlayerRepositoryPort>,
    history: Arc<dyn BattleHistoryRepositoryPort>,
    energy: Arc<EnergyService>,
    progression: Arc<ProgressionService>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl BattleService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<RwLock<BattleSessionStore>>,
        catalog: Arc<SongCatalog>,
        players: Arc<dyn PlayerRepositoryPort>,
        history: Arc<dyn BattleHistoryRepositoryPort>,
        energy: Arc<EnergyService>,
        progression: Arc<ProgressionService>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            sessions,
            catalog,
            players,
            history,
            energy,
            progression,
            clock,
            random,
        }
    }

    /// Start a battle on `song_id`, paying its energy cost up front
    #[instrument(skip(self))]
    pub async fn start_battle(
        &self,
        player_id: PlayerId,
        song_id: &str,
    ) -> Result<BattleView, EngineError> {
        if self.sessions.read().await.contains(player_id) {
            return Err(EngineError::invalid_state("A battle is already in progress"));
        }

        let song = self
            .catalog
            .get(song_id)
            .ok_or_else(|| EngineError::not_found("Song", song_id))?;

        if self.players.get_player(player_id).await?.is_none() {
            return Err(EngineError::not_found("Player", player_id));
        }

        let notes = generate_pattern(song.note_count, song.difficulty, |min, max| {
            self.random.gen_range(min, max)
        });

        self.energy.use_energy(player_id, song.energy_cost).await?;

        let session = BattleSession::new(player_id, song, notes, self.clock.now());
        let view = BattleView::from_session(&session);

        if self.sessions.write().await.insert(session).is_err() {
            // Only reachable if the caller skipped the per-player lock
            warn!(player_id = %player_id, "Concurrent battle start; keeping the first session");
            return Err(EngineError::invalid_state("A battle is already in progress"));
        }

        info!(
            player_id = %player_id,
            song_id = %song.id,
            notes = song.note_count,
            "Battle started"
        );
        Ok(view)
    }

    /// Judge the current note. The final note settles the battle: it is
    /// recorded, rewarded and removed from the active set.
    #[instrument(skip(self, arrows))]
    pub async fn process_input(
        &self,
        player_id: PlayerId,
        arrows: &ArrowSet,
        timing: TimingAccuracy,
    ) -> Result<InputOutcome, EngineError> {
        let now = self.clock.now();

        let (result, battle, finished) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get_mut(player_id)
                .ok_or_else(|| EngineError::invalid_state("No active battle"))?;

            let result = session.process_input(arrows, timing, now)?;
            let battle = BattleView::from_session(session);
            debug!(
                player_id = %player_id,
                note = result.note_index,
                points = result.points,
                combo = result.combo,
                "Note judged"
            );

            let finished = if session.is_complete() {
                sessions.remove(player_id)
            } else {
                None
            };
            (result, battle, finished)
        };

        let completion = match finished {
            Some(session) => Some(self.settle(&session, now).await?),
            None => None,
        };

        Ok(InputOutcome {
            result,
            battle,
            completion,
        })
    }

    /// Drop the player's active battle. Nothing is recorded or refunded.
    #[instrument(skip(self))]
    pub async fn abandon_battle(&self, player_id: PlayerId) -> Result<BattleView, EngineError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(player_id)
            .ok_or_else(|| EngineError::invalid_state("No active battle"))?;

        info!(
            player_id = %player_id,
            song_id = %session.song_id(),
            judged = session.current_note(),
            "Battle abandoned"
        );
        Ok(BattleView::from_session(&session))
    }

    pub async fn current_battle(&self, player_id: PlayerId) -> Result<BattleView, EngineError> {
        self.sessions
            .read()
            .await
            .get(player_id)
            .map(BattleView::from_session)
            .ok_or_else(|| EngineError::not_found("Battle", player_id))
    }

    async fn settle(
        &self,
        session: &BattleSession,
        now: DateTime<Utc>,
    ) -> Result<BattleCompletion, EngineError> {
        let player_id = session.player_id();
        let summary = summarize(session)?;

        self.history
            .record_battle(player_id, &BattleRecord::from_summary(&summary, now))
            .await?;

        let rewards = self
            .progression
            .apply_battle_rewards(player_id, summary.score, summary.max_combo, summary.perfect_hits)
            .await?;

        info!(
            player_id = %player_id,
            song_id = %summary.song_id,
            score = summary.score,
            grade = %summary.grade,
            "Battle complete"
        );
        Ok(BattleCompletion { summary, rewards })
    }
}
