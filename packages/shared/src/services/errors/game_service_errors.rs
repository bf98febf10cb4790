use crate::models::filter::FilterError;
use crate::models::game::GameValidationError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum GameServiceError {
    InvalidInput(String),
    ValidationError(String),
    GameNotFound(i64),
    RepositoryError(String),
    SerializationError(String),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::InvalidInput(msg) => write!(f, "{}", msg),
            GameServiceError::ValidationError(msg) => write!(f, "{}", msg),
            GameServiceError::GameNotFound(id) => {
                write!(f, "Entity not found: Game with id {}", id)
            }
            GameServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            GameServiceError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        match err {
            GameRepositoryError::NotFound(id) => GameServiceError::GameNotFound(id),
            GameRepositoryError::Serialization(msg) => GameServiceError::SerializationError(msg),
            other => GameServiceError::RepositoryError(other.to_string()),
        }
    }
}

impl From<FilterError> for GameServiceError {
    fn from(err: FilterError) -> Self {
        GameServiceError::InvalidInput(err.to_string())
    }
}

impl From<GameValidationError> for GameServiceError {
    fn from(err: GameValidationError) -> Self {
        GameServiceError::ValidationError(err.to_string())
    }
}
