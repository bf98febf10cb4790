use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::models::count::Count;
use crate::models::filter::{Filter, Where};
use crate::models::game::{Game, GamePatch, NewGame};
use crate::repositories::game_repository::GameRepository;
use crate::services::errors::game_service_errors::GameServiceError;

/// Translates request inputs into exactly one repository call each.
///
/// Filter arguments arrive as raw JSON strings and are parsed before the
/// repository is touched, so malformed input never reaches the store.
#[derive(Clone)]
pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
}

impl GameService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        GameService { repository }
    }

    pub async fn create(&self, body: &Value) -> Result<Game, GameServiceError> {
        let new_game = NewGame::from_body(body)?;
        let game = self.repository.create(&new_game).await?;
        debug!("Created game {} ({})", game.id, game.title);
        Ok(game)
    }

    pub async fn count(&self, where_: Option<&str>) -> Result<Count, GameServiceError> {
        let where_ = Where::parse(where_)?;
        let count = self.repository.count(&where_).await?;
        Ok(Count::new(count))
    }

    /// Returns matching games, projected when the filter names `fields`.
    pub async fn find(&self, filter: Option<&str>) -> Result<Vec<Value>, GameServiceError> {
        let filter = Filter::parse(filter)?;
        let games = self.repository.find(&filter).await?;
        games.iter().map(|game| project(&filter, game)).collect()
    }

    pub async fn update_all(
        &self,
        body: &Value,
        where_: Option<&str>,
    ) -> Result<Count, GameServiceError> {
        let where_ = Where::parse(where_)?;
        let patch = GamePatch::from_body(None, body)?;
        let updated = self.repository.update_all(&patch, &where_).await?;
        debug!("Bulk update touched {} games", updated);
        Ok(Count::new(updated))
    }

    pub async fn find_by_id(
        &self,
        id: i64,
        filter: Option<&str>,
    ) -> Result<Value, GameServiceError> {
        let filter = Filter::parse_excluding_where(filter)?;
        let game = self.repository.find_by_id(id).await?;
        project(&filter, &game)
    }

    pub async fn update_by_id(&self, id: i64, body: &Value) -> Result<(), GameServiceError> {
        let patch = GamePatch::from_body(Some(id), body)?;
        self.repository.update_by_id(id, &patch).await?;
        Ok(())
    }

    pub async fn replace_by_id(&self, id: i64, body: &Value) -> Result<(), GameServiceError> {
        let game = NewGame::from_replace_body(id, body)?;
        self.repository.replace_by_id(id, &game).await?;
        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), GameServiceError> {
        self.repository.delete_by_id(id).await?;
        debug!("Deleted game {}", id);
        Ok(())
    }
}

fn project(filter: &Filter, game: &Game) -> Result<Value, GameServiceError> {
    let projected = match &filter.fields {
        Some(fields) => fields.project(game),
        None => serde_json::to_value(game),
    };
    projected.map_err(|e| GameServiceError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::Platform;
    use crate::repositories::errors::game_repository_errors::GameRepositoryError;
    use crate::repositories::game_repository::{InMemoryGameRepository, MockGameRepository};
    use serde_json::json;

    fn service_with(mock: MockGameRepository) -> GameService {
        GameService::new(Arc::new(mock))
    }

    async fn seeded_service() -> GameService {
        let repository = InMemoryGameRepository::new();
        repository
            .create_all(&[
                NewGame {
                    year: Some(1985),
                    ..NewGame::new("Super Mario Bros.", Some(Platform::Nes))
                },
                NewGame {
                    year: Some(1991),
                    ..NewGame::new("The Legend of Zelda", Some(Platform::Nes))
                },
                NewGame {
                    year: Some(1991),
                    ..NewGame::new("F-Zero", Some(Platform::Snes))
                },
            ])
            .await
            .unwrap();
        GameService::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn test_create_returns_stored_game_with_defaults() {
        let service = GameService::new(Arc::new(InMemoryGameRepository::new()));
        let game = service
            .create(&json!({"title": "Super Mario World", "platform": "Super Nintendo (SNES)"}))
            .await
            .unwrap();

        assert_eq!(game.id, 1);
        assert_eq!(game.genre, "Misc");
        assert_eq!(game.year, 0);
        assert_eq!(game.rating, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body_without_store_call() {
        let mut mock = MockGameRepository::new();
        mock.expect_create().never();

        let result = service_with(mock).create(&json!({"platform": "NES"})).await;
        assert!(matches!(result, Err(GameServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_malformed_where_never_reaches_repository() {
        let mut mock = MockGameRepository::new();
        mock.expect_count().never();
        mock.expect_update_all().never();
        let service = service_with(mock);

        let count = service.count(Some("{platform:NES")).await;
        assert!(matches!(count, Err(GameServiceError::InvalidInput(_))));

        let update = service.update_all(&json!({"rating": 1}), Some("nope")).await;
        assert!(matches!(update, Err(GameServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_malformed_filter_never_reaches_repository() {
        let mut mock = MockGameRepository::new();
        mock.expect_find().never();
        mock.expect_find_by_id().never();
        let service = service_with(mock);

        let find = service.find(Some("{\"where\":")).await;
        assert!(matches!(find, Err(GameServiceError::InvalidInput(_))));

        let find_by_id = service.find_by_id(1, Some("[")).await;
        assert!(matches!(find_by_id, Err(GameServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_message_names_parameter() {
        let service = service_with(MockGameRepository::new());
        let err = service.count(Some("{")).await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Invalid JSON string in \"where\" parameter"));
    }

    #[tokio::test]
    async fn test_count_without_where_passes_empty_predicate() {
        let mut mock = MockGameRepository::new();
        mock.expect_count()
            .withf(|where_: &Where| where_.is_empty())
            .times(1)
            .returning(|_| Ok(3));

        let count = service_with(mock).count(None).await.unwrap();
        assert_eq!(count, Count::new(3));
    }

    #[tokio::test]
    async fn test_count_with_where() {
        let service = seeded_service().await;
        let count = service.count(Some(r#"{"platform":"NES"}"#)).await.unwrap();
        assert_eq!(count.count, 2);
    }

    #[tokio::test]
    async fn test_find_orders_and_projects() {
        let service = seeded_service().await;
        let games = service
            .find(Some(
                r#"{"where":{"year":1991},"order":["title ASC"],"fields":["title"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(
            games,
            vec![json!({"title": "F-Zero"}), json!({"title": "The Legend of Zelda"})]
        );
    }

    #[tokio::test]
    async fn test_find_by_id_ignores_where() {
        let service = seeded_service().await;
        let game = service
            .find_by_id(1, Some(r#"{"where":{"year":2000}}"#))
            .await
            .unwrap();
        assert_eq!(game["title"], "Super Mario Bros.");
    }

    #[tokio::test]
    async fn test_update_all_returns_count() {
        let service = seeded_service().await;
        let count = service
            .update_all(&json!({"genre": "Classic"}), Some(r#"{"year":1991}"#))
            .await
            .unwrap();
        assert_eq!(count.count, 2);

        let classics = service.count(Some(r#"{"genre":"Classic"}"#)).await.unwrap();
        assert_eq!(classics.count, 2);
    }

    #[tokio::test]
    async fn test_not_found_is_mapped() {
        let mut mock = MockGameRepository::new();
        mock.expect_delete_by_id()
            .returning(|id| Err(GameRepositoryError::NotFound(id)));

        let result = service_with(mock).delete_by_id(999).await;
        assert!(matches!(result, Err(GameServiceError::GameNotFound(999))));
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let mut mock = MockGameRepository::new();
        mock.expect_find()
            .returning(|_| Err(GameRepositoryError::DynamoDb("throttled".to_string())));

        let result = service_with(mock).find(None).await;
        assert!(matches!(result, Err(GameServiceError::RepositoryError(msg)) if msg.contains("throttled")));
    }

    #[tokio::test]
    async fn test_replace_requires_full_record() {
        let mut mock = MockGameRepository::new();
        mock.expect_replace_by_id().never();

        let result = service_with(mock)
            .replace_by_id(1, &json!({"platform": "NES"}))
            .await;
        assert!(matches!(result, Err(GameServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_by_id_and_missing_ids() {
        let service = seeded_service().await;
        service
            .update_by_id(2, &json!({"rating": 10}))
            .await
            .unwrap();
        let game = service.find_by_id(2, None).await.unwrap();
        assert_eq!(game["rating"], 10);

        for result in [
            service.update_by_id(42, &json!({"rating": 1})).await,
            service.replace_by_id(42, &json!({"title": "x"})).await,
            service.delete_by_id(42).await,
        ] {
            assert!(matches!(result, Err(GameServiceError::GameNotFound(42))));
        }
        assert!(matches!(
            service.find_by_id(42, None).await,
            Err(GameServiceError::GameNotFound(42))
        ));
    }
}
