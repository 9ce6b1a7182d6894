//! gridfall - a terminal falling-block game.
//!
//! The crate splits into a pure simulation core (`core`, `types`) and a thin
//! terminal host (`input`, `term`); the binary in `main.rs` wires the two
//! together with a frame clock.

pub mod core;
pub mod input;
pub mod term;
pub mod types;
