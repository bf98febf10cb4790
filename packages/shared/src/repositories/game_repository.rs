use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::filter::{Filter, Where};
use crate::models::game::{Game, GamePatch, NewGame};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Data access for the game catalog. Every method is a single atomic store call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create(&self, game: &NewGame) -> Result<Game, GameRepositoryError>;
    async fn create_all(&self, games: &[NewGame]) -> Result<Vec<Game>, GameRepositoryError>;
    async fn count(&self, where_: &Where) -> Result<u64, GameRepositoryError>;
    async fn find(&self, filter: &Filter) -> Result<Vec<Game>, GameRepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Game, GameRepositoryError>;
    async fn update_all(
        &self,
        patch: &GamePatch,
        where_: &Where,
    ) -> Result<u64, GameRepositoryError>;
    async fn update_by_id(&self, id: i64, patch: &GamePatch) -> Result<(), GameRepositoryError>;
    async fn replace_by_id(&self, id: i64, game: &NewGame) -> Result<(), GameRepositoryError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), GameRepositoryError>;
}

#[derive(Default)]
struct Store {
    games: BTreeMap<i64, Game>,
    last_id: i64,
}

impl Store {
    fn insert(&mut self, new_game: &NewGame) -> Game {
        self.last_id += 1;
        let game = Game::new(self.last_id, new_game);
        self.games.insert(game.id, game.clone());
        game
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut Game, GameRepositoryError> {
        self.games
            .get_mut(&id)
            .ok_or(GameRepositoryError::NotFound(id))
    }
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryGameRepository {
    store: RwLock<Store>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create(&self, game: &NewGame) -> Result<Game, GameRepositoryError> {
        Ok(self.store.write().await.insert(game))
    }

    async fn create_all(&self, games: &[NewGame]) -> Result<Vec<Game>, GameRepositoryError> {
        let mut store = self.store.write().await;
        Ok(games.iter().map(|game| store.insert(game)).collect())
    }

    async fn count(&self, where_: &Where) -> Result<u64, GameRepositoryError> {
        let store = self.store.read().await;
        Ok(store.games.values().filter(|g| where_.matches(g)).count() as u64)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Game>, GameRepositoryError> {
        let store = self.store.read().await;
        Ok(filter.apply(store.games.values().cloned()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Game, GameRepositoryError> {
        let store = self.store.read().await;
        store
            .games
            .get(&id)
            .cloned()
            .ok_or(GameRepositoryError::NotFound(id))
    }

    async fn update_all(
        &self,
        patch: &GamePatch,
        where_: &Where,
    ) -> Result<u64, GameRepositoryError> {
        let mut store = self.store.write().await;
        let mut updated = 0;
        for game in store.games.values_mut().filter(|g| where_.matches(g)) {
            game.apply(patch);
            updated += 1;
        }
        Ok(updated)
    }

    async fn update_by_id(&self, id: i64, patch: &GamePatch) -> Result<(), GameRepositoryError> {
        self.store.write().await.get_mut(id)?.apply(patch);
        Ok(())
    }

    async fn replace_by_id(&self, id: i64, game: &NewGame) -> Result<(), GameRepositoryError> {
        self.store.write().await.get_mut(id)?.replace(game);
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), GameRepositoryError> {
        self.store
            .write()
            .await
            .games
            .remove(&id)
            .map(|_| ())
            .ok_or(GameRepositoryError::NotFound(id))
    }
}
