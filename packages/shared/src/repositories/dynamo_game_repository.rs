use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, from_items, to_item};
use tracing::debug;

use crate::models::filter::{Filter, Where};
use crate::models::game::{Game, GamePatch, NewGame};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::GameRepository;

/// Key of the item holding the id counter. Real games always have `id >= 1`.
const COUNTER_ID: &str = "0";

/// Games stored in a DynamoDB table keyed by the numeric `id` attribute.
///
/// Predicates, ordering and pagination are evaluated after a full scan, so
/// this backend suits catalogs that fit comfortably in memory.
pub struct DynamoDbGameRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(id: i64) -> AttributeValue {
        AttributeValue::N(id.to_string())
    }

    async fn next_id(&self) -> Result<i64, GameRepositoryError> {
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::N(COUNTER_ID.to_string()))
            .update_expression("ADD next_id :one")
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        output
            .attributes
            .as_ref()
            .and_then(|attributes| attributes.get("next_id"))
            .and_then(|value| value.as_n().ok())
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| {
                GameRepositoryError::DynamoDb("id counter returned no value".to_string())
            })
    }

    async fn put(&self, game: &Game, must_exist: bool) -> Result<(), GameRepositoryError> {
        let item = to_item(game).map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        let condition = if must_exist {
            "attribute_exists(id)"
        } else {
            "attribute_not_exists(id)"
        };
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(condition)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if must_exist
                    && e.as_service_error()
                        .is_some_and(|err| err.is_conditional_check_failed_exception()) =>
            {
                Err(GameRepositoryError::NotFound(game.id))
            }
            Err(e) => Err(GameRepositoryError::DynamoDb(e.to_string())),
        }
    }

    async fn scan(&self) -> Result<Vec<Game>, GameRepositoryError> {
        let items: Vec<HashMap<String, AttributeValue>> = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#id > :counter")
            .expression_attribute_names("#id", "id")
            .expression_attribute_values(":counter", AttributeValue::N(COUNTER_ID.to_string()))
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        let mut games: Vec<Game> =
            from_items(items).map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        games.sort_by_key(|game| game.id);
        debug!("Scanned {} games from {}", games.len(), self.table_name);
        Ok(games)
    }
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn create(&self, game: &NewGame) -> Result<Game, GameRepositoryError> {
        let game = Game::new(self.next_id().await?, game);
        self.put(&game, false).await?;
        Ok(game)
    }

    async fn create_all(&self, games: &[NewGame]) -> Result<Vec<Game>, GameRepositoryError> {
        let mut created = Vec::with_capacity(games.len());
        for game in games {
            created.push(self.create(game).await?);
        }
        Ok(created)
    }

    async fn count(&self, where_: &Where) -> Result<u64, GameRepositoryError> {
        let games = self.scan().await?;
        Ok(games.iter().filter(|g| where_.matches(g)).count() as u64)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Game>, GameRepositoryError> {
        Ok(filter.apply(self.scan().await?))
    }

    async fn find_by_id(&self, id: i64) -> Result<Game, GameRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", Self::key(id))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) if id > 0 => {
                from_item(item).map_err(|e| GameRepositoryError::Serialization(e.to_string()))
            }
            _ => Err(GameRepositoryError::NotFound(id)),
        }
    }

    async fn update_all(
        &self,
        patch: &GamePatch,
        where_: &Where,
    ) -> Result<u64, GameRepositoryError> {
        let mut updated = 0;
        for mut game in self.scan().await?.into_iter().filter(|g| where_.matches(g)) {
            game.apply(patch);
            self.put(&game, true).await?;
            updated += 1;
        }
        Ok(updated)
    }

    async fn update_by_id(&self, id: i64, patch: &GamePatch) -> Result<(), GameRepositoryError> {
        let mut game = self.find_by_id(id).await?;
        game.apply(patch);
        self.put(&game, true).await
    }

    async fn replace_by_id(&self, id: i64, game: &NewGame) -> Result<(), GameRepositoryError> {
        if id < 1 {
            return Err(GameRepositoryError::NotFound(id));
        }
        self.put(&Game::new(id, game), true).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), GameRepositoryError> {
        if id < 1 {
            return Err(GameRepositoryError::NotFound(id));
        }
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", Self::key(id))
            .condition_expression("attribute_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|err| err.is_conditional_check_failed_exception())
                {
                    Err(GameRepositoryError::NotFound(id))
                } else {
                    Err(GameRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }
}
