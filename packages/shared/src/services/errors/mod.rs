pub mod game_service_errors;
pub mod seed_errors;
