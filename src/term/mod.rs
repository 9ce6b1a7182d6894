//! Terminal rendering module.
//!
//! A small game-oriented rendering layer: `game_view` maps simulation state
//! into a framebuffer (pure, testable), `renderer` flushes framebuffers to
//! the real terminal. The simulation core stays free of any of this.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
