pub mod errors;
pub mod game_service;
pub mod seed_service;
