use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::models::filter::Where;
use crate::models::game::NewGame;
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::seed_errors::SeedError;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(rename = "Game")]
    games: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Skipped { existing: u64 },
    Loaded(usize),
}

/// Populates an empty store from a JSON document with a top-level `Game` array.
pub struct SeedService {
    repository: Arc<dyn GameRepository + Send + Sync>,
}

impl SeedService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        SeedService { repository }
    }

    pub async fn seed_if_empty(&self, path: &Path) -> Result<SeedOutcome, SeedError> {
        let existing = self.repository.count(&Where::default()).await?;
        if existing > 0 {
            info!("Store already holds {} games, skipping seed", existing);
            return Ok(SeedOutcome::Skipped { existing });
        }

        info!("Loading games from {}", path.display());
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SeedError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let games = parse_seed(&raw)?;
        let created = self.repository.create_all(&games).await?;

        info!("Seeded {} games", created.len());
        Ok(SeedOutcome::Loaded(created.len()))
    }
}

/// Validates every record as a create body. Stored ids are dropped and reassigned.
fn parse_seed(raw: &str) -> Result<Vec<NewGame>, SeedError> {
    let seed: SeedFile = serde_json::from_str(raw).map_err(|e| SeedError::Parse(e.to_string()))?;

    seed.games
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            if let Value::Object(fields) = &mut record {
                fields.remove("id");
            }
            NewGame::from_body(&record).map_err(|e| SeedError::InvalidRecord {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
