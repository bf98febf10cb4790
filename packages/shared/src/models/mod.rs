pub mod count;
pub mod filter;
pub mod game;
