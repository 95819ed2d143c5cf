//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    BattleHistoryRepositoryPort, ClockPort, PlayerRepositoryPort, QuestRepositoryPort, RandomPort,
};
use crate::application::services::{
    BattleService, EnergyService, PlayerService, ProgressionService, QuestService,
};
use crate::domain::entities::SongCatalog;
use crate::infrastructure::battle_sessions::{BattleSessionStore, PlayerLocks};
use crate::infrastructure::clock::{SystemClock, SystemRandom};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<SongCatalog>,
    /// Serializes mutating requests per player
    pub player_locks: PlayerLocks,
    // Application services
    pub player_service: Arc<PlayerService>,
    pub energy_service: Arc<EnergyService>,
    pub quest_service: Arc<QuestService>,
    pub progression_service: Arc<ProgressionService>,
    pub battle_service: Arc<BattleService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let repository = SqliteRepository::connect(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?;

        let catalog = match &config.song_catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read song catalog {}", path))?;
                SongCatalog::from_json(&json)
                    .with_context(|| format!("Invalid song catalog {}", path))?
            }
            None => SongCatalog::builtin(),
        };

        let random: Arc<dyn RandomPort> = match config.rng_seed {
            Some(seed) => Arc::new(SystemRandom::from_seed(seed)),
            None => Arc::new(SystemRandom::from_entropy()),
        };

        Ok(Self::from_parts(
            config,
            repository,
            catalog,
            Arc::new(SystemClock),
            random,
        ))
    }

    /// Wire services over an already opened repository
    pub fn from_parts(
        config: AppConfig,
        repository: SqliteRepository,
        catalog: SongCatalog,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let players: Arc<dyn PlayerRepositoryPort> = Arc::new(repository.players());
        let quests: Arc<dyn QuestRepositoryPort> = Arc::new(repository.quests());
        let history: Arc<dyn BattleHistoryRepositoryPort> = Arc::new(repository.battles());
        let catalog = Arc::new(catalog);

        let energy_service = Arc::new(EnergyService::new(
            players.clone(),
            clock.clone(),
            config.energy_cooldown(),
        ));
        let quest_service = Arc::new(QuestService::new(quests, clock.clone(), random.clone()));
        let progression_service = Arc::new(ProgressionService::new(
            players.clone(),
            quest_service.clone(),
            energy_service.clone(),
        ));
        let player_service = Arc::new(PlayerService::new(
            players.clone(),
            quest_service.clone(),
            energy_service.clone(),
            clock.clone(),
        ));
        let battle_service = Arc::new(BattleService::new(
            Arc::new(RwLock::new(BattleSessionStore::new())),
            catalog.clone(),
            players,
            history,
            energy_service.clone(),
            progression_service.clone(),
            clock,
            random,
        ));

        Self {
            config,
            catalog,
            player_locks: PlayerLocks::new(),
            player_service,
            energy_service,
            quest_service,
            progression_service,
            battle_service,
        }
    }
}
