use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum SeedError {
    Io { path: String, message: String },
    Parse(String),
    InvalidRecord { index: usize, message: String },
    RepositoryError(GameRepositoryError),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Io { path, message } => {
                write!(f, "Cannot read seed file {}: {}", path, message)
            }
            SeedError::Parse(msg) => write!(f, "Malformed seed file: {}", msg),
            SeedError::InvalidRecord { index, message } => {
                write!(f, "Seed record {} is invalid: {}", index, message)
            }
            SeedError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<GameRepositoryError> for SeedError {
    fn from(err: GameRepositoryError) -> Self {
        SeedError::RepositoryError(err)
    }
}
