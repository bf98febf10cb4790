use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ping", get(routes::health::ping))
        .route("/openapi.json", get(routes::openapi::openapi_spec))
        .merge(routes::games::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
