//! Errors surfaced by the engine's use cases

use crate::application::ports::outbound::RepoError;
use crate::domain::entities::BattleError;

/// Recoverable failures reported back to the caller
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Not enough energy: {required} required, {available} available")]
    InsufficientResource { required: u32, available: u32 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Repo(RepoError),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<RepoError> for EngineError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            RepoError::ConstraintViolation(message) => Self::InvalidState(message),
            other => Self::Repo(other),
        }
    }
}

impl From<BattleError> for EngineError {
    fn from(err: BattleError) -> Self {
        Self::InvalidState(err.to_string())
    }
}
