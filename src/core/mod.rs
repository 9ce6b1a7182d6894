//! Core module - pure game logic with no I/O
//!
//! This module contains the whole simulation: the board, the shape library
//! and rotation, the collision and merge rules, and the falling-piece state
//! machine. It has zero dependencies on UI or terminal handling.

pub mod board;
pub mod game_state;
pub mod rng;
pub mod shape;

// Re-export commonly used types
pub use board::Board;
pub use game_state::{ActivePiece, GameEvent, GameState};
pub use rng::SimpleRng;
pub use shape::{InvalidVariant, Shape};
