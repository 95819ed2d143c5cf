//! Outbound ports - Interfaces that the application requires from external systems

mod battle_history_port;
mod clock_port;
mod error;
mod player_repository_port;
mod quest_repository_port;

pub use battle_history_port::{BattleHistoryRepositoryPort, BattleRecord};
pub use clock_port::{ClockPort, RandomPort};
pub use error::RepoError;
pub use player_repository_port::PlayerRepositoryPort;
pub use quest_repository_port::QuestRepositoryPort;

#[cfg(test)]
pub use battle_history_port::MockBattleHistoryRepositoryPort;
#[cfg(test)]
pub use clock_port::{MockClockPort, MockRandomPort};
#[cfg(test)]
pub use player_repository_port::MockPlayerRepositoryPort;
#[cfg(test)]
pub use quest_repository_port::MockQuestRepositoryPort;
