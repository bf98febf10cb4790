use std::sync::Arc;

use shared::services::game_service::GameService;

#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
}

impl AppState {
    pub fn new(game_service: Arc<GameService>) -> Self {
        AppState { game_service }
    }
}
