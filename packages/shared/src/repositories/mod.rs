pub mod dynamo_game_repository;
pub mod errors;
pub mod game_repository;
