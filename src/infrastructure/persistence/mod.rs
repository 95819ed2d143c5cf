//! SQLite persistence adapters
//!
//! One pool shared by three repositories, each implementing an outbound
//! port. The schema is created on startup.

mod battle_history_repository;
mod player_repository;
mod quest_repository;

pub use battle_history_repository::SqliteBattleHistoryRepository;
pub use player_repository::SqlitePlayerRepository;
pub use quest_repository::SqliteQuestRepository;

use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id TEXT PRIMARY KEY,
        external_id INTEGER NOT NULL UNIQUE,
        username TEXT,
        display_name TEXT NOT NULL,
        level INTEGER NOT NULL DEFAULT 1,
        exp INTEGER NOT NULL DEFAULT 0,
        money INTEGER NOT NULL DEFAULT 100,
        health INTEGER NOT NULL DEFAULT 100,
        max_health INTEGER NOT NULL DEFAULT 100,
        energy INTEGER NOT NULL DEFAULT 100,
        max_energy INTEGER NOT NULL DEFAULT 100,
        last_energy_update TEXT NOT NULL,
        rhythm INTEGER NOT NULL DEFAULT 50,
        charisma INTEGER NOT NULL DEFAULT 30,
        strength INTEGER NOT NULL DEFAULT 40,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS story_progress (
        player_id TEXT PRIMARY KEY REFERENCES players(id),
        chapter INTEGER NOT NULL DEFAULT 1,
        pico_relationship INTEGER NOT NULL DEFAULT 0,
        boyfriend_relationship INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS player_stats (
        player_id TEXT PRIMARY KEY REFERENCES players(id),
        total_battles INTEGER NOT NULL DEFAULT 0,
        battles_won INTEGER NOT NULL DEFAULT 0,
        perfect_scores INTEGER NOT NULL DEFAULT 0,
        max_combo INTEGER NOT NULL DEFAULT 0,
        money_earned INTEGER NOT NULL DEFAULT 0,
        total_play_secs REAL NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        player_id TEXT NOT NULL REFERENCES players(id),
        item_id TEXT NOT NULL,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        PRIMARY KEY (player_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS active_quests (
        player_id TEXT NOT NULL REFERENCES players(id),
        quest_id TEXT NOT NULL,
        quest_type TEXT NOT NULL,
        progress INTEGER NOT NULL DEFAULT 0,
        target INTEGER NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        started_at TEXT NOT NULL,
        expires_at TEXT,
        PRIMARY KEY (player_id, quest_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS achievements (
        player_id TEXT NOT NULL REFERENCES players(id),
        achievement_id TEXT NOT NULL,
        name TEXT NOT NULL,
        progress INTEGER NOT NULL DEFAULT 0,
        target INTEGER NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT,
        PRIMARY KEY (player_id, achievement_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS battle_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id TEXT NOT NULL REFERENCES players(id),
        song_id TEXT NOT NULL,
        score INTEGER NOT NULL,
        max_combo INTEGER NOT NULL,
        perfect_hits INTEGER NOT NULL,
        good_hits INTEGER NOT NULL,
        bad_hits INTEGER NOT NULL,
        missed INTEGER NOT NULL,
        duration_secs REAL NOT NULL,
        recorded_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_battle_history_player ON battle_history(player_id)",
];

/// Combined repository providing access to all SQLite repositories
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Wrap a pool, creating the schema if needed
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(database_url).await?;
        Self::new(pool).await
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::new(pool).await
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn players(&self) -> SqlitePlayerRepository {
        SqlitePlayerRepository::new(self.pool.clone())
    }

    pub fn quests(&self) -> SqliteQuestRepository {
        SqliteQuestRepository::new(self.pool.clone())
    }

    pub fn battles(&self) -> SqliteBattleHistoryRepository {
        SqliteBattleHistoryRepository::new(self.pool.clone())
    }
}
