//! Core game logic module for Snake
//!
//! Everything here is pure state-machine territory: the snake, the grid,
//! food placement and the per-tick rules. No I/O or rendering dependencies.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepOutcome, GAME_OVER_MESSAGE, WIN_MESSAGE};
pub use state::{Cell, CollisionType, GameState, GameStatus, Snake};
