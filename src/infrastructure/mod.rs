//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapters for players, quests and battle history
//! - HTTP: REST API routes
//! - Battle sessions: in-memory active battles and per-player locks
//! - Clock: system time and randomness
//! - Config: Application configuration
//! - State: Shared application state

pub mod battle_sessions;
pub mod clock;
pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
