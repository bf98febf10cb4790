use std::env::set_var;
use std::sync::Arc;

use api::{config::Config, create_app, state::AppState};
use lambda_http::{run, Error};
use shared::repositories::dynamo_game_repository::DynamoDbGameRepository;
use shared::repositories::game_repository::{GameRepository, InMemoryGameRepository};
use shared::services::game_service::GameService;
use shared::services::seed_service::SeedService;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let repository: Arc<dyn GameRepository + Send + Sync> = match &config.games_table {
        Some(table_name) => {
            let aws_config = aws_config::load_from_env().await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            info!("Using DynamoDB table {}", table_name);
            Arc::new(DynamoDbGameRepository::new(client, table_name.clone()))
        }
        None => {
            info!("Using in-memory game store");
            Arc::new(InMemoryGameRepository::new())
        }
    };

    // Seed before binding the listener
    SeedService::new(repository.clone())
        .seed_if_empty(&config.seed_file)
        .await?;

    let app = create_app(AppState::new(Arc::new(GameService::new(repository))));

    if config.lambda {
        set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");
        return run(app).await;
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server is running at http://{}", listener.local_addr()?);
    info!("Try http://{}/ping", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
