//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Board dimensions
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const DROP_INTERVAL_MS: u32 = 500;

/// How long the host keeps the game-over banner on screen
pub const GAME_OVER_BANNER_MS: u32 = 1500;

/// Piece variant kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    I,
    S,
    Z,
}

impl PieceKind {
    /// All variants, in label order (label 1 first)
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Stable numeric label, 1-7. Label 0 is reserved for empty cells;
    /// the renderer uses the label as its palette index.
    pub fn label(&self) -> u8 {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::label`]
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            1 => Some(PieceKind::T),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::I),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// One-letter name for debug displays
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::T => "T",
            PieceKind::O => "O",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::I => "I",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// Player-facing game actions. Exactly the four gameplay inputs the
/// simulation understands; quitting is a host concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}
