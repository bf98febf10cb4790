use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use shared::models::count::Count;
use shared::models::game::Game;
use tracing::{debug, error};

use crate::{
    error::ApiError,
    extract::{GameId, JsonBody, QueryParams},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct WhereQuery {
    #[serde(rename = "where")]
    pub where_: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(find).post(create).patch(update_all))
        .route("/games/count", get(count))
        .route(
            "/games/{id}",
            get(find_by_id)
                .patch(update_by_id)
                .put(replace_by_id)
                .delete(delete_by_id),
        )
}

#[tracing::instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Game>, ApiError> {
    state
        .game_service
        .create(&body)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to create game: {}", e);
            ApiError::from(e)
        })
}

#[tracing::instrument(skip(state))]
async fn count(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WhereQuery>,
) -> Result<Json<Count>, ApiError> {
    state
        .game_service
        .count(query.where_.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to count games: {}", e);
            ApiError::from(e)
        })
}

#[tracing::instrument(skip(state))]
async fn find(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    state
        .game_service
        .find(query.filter.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list games: {}", e);
            ApiError::from(e)
        })
}

#[tracing::instrument(skip(state, body))]
async fn update_all(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WhereQuery>,
    JsonBody(body): JsonBody,
) -> Result<Json<Count>, ApiError> {
    let count = state
        .game_service
        .update_all(&body, query.where_.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to update games: {}", e);
            ApiError::from(e)
        })?;
    debug!("Updated {} games", count.count);
    Ok(Json(count))
}

#[tracing::instrument(skip(state))]
async fn find_by_id(
    State(state): State<AppState>,
    GameId(id): GameId,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<Json<Value>, ApiError> {
    state
        .game_service
        .find_by_id(id, query.filter.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to retrieve game {}: {}", id, e);
            ApiError::from(e)
        })
}

#[tracing::instrument(skip(state, body))]
async fn update_by_id(
    State(state): State<AppState>,
    GameId(id): GameId,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    state
        .game_service
        .update_by_id(id, &body)
        .await
        .map_err(|e| {
            error!("Failed to update game {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!("Game updated successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, body))]
async fn replace_by_id(
    State(state): State<AppState>,
    GameId(id): GameId,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    state
        .game_service
        .replace_by_id(id, &body)
        .await
        .map_err(|e| {
            error!("Failed to replace game {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!("Game replaced successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
async fn delete_by_id(
    State(state): State<AppState>,
    GameId(id): GameId,
) -> Result<StatusCode, ApiError> {
    state.game_service.delete_by_id(id).await.map_err(|e| {
        error!("Failed to delete game {}: {}", id, e);
        ApiError::from(e)
    })?;
    debug!("Game deleted successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
