pub mod models;
pub mod repositories;
pub mod services;

pub use models::count::Count;
pub use models::filter::{Filter, Where};
pub use models::game::{Game, GamePatch, NewGame, Platform};
pub use repositories::game_repository::{GameRepository, InMemoryGameRepository};
