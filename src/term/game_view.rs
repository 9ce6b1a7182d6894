//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It owns the label-to-color mapping: a fixed
//! 8-entry palette indexed by `PieceKind::label`, with index 0 as the board
//! background.

use crate::core::GameState;
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Fixed palette; entry 0 is the empty-cell background, entries 1-7 are the
/// piece variants in label order.
const PALETTE: [Rgb; 8] = [
    Rgb::new(30, 30, 40),
    Rgb::new(255, 13, 114),
    Rgb::new(13, 194, 255),
    Rgb::new(13, 255, 114),
    Rgb::new(245, 56, 255),
    Rgb::new(255, 142, 13),
    Rgb::new(255, 225, 56),
    Rgb::new(56, 119, 255),
];

fn piece_color(kind: PieceKind) -> Rgb {
    PALETTE[kind.label() as usize]
}

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A lightweight terminal view for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render the current game state into a framebuffer. `banner` is an
    /// optional overlay line (the host passes the game-over notice).
    pub fn render(&self, state: &GameState, viewport: Viewport, banner: Option<&str>) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        };

        self.draw_border(&mut fb, start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                match state.board().get(x, y).flatten() {
                    Some(kind) => {
                        self.draw_board_cell(&mut fb, start_x, start_y, x as u16, y as u16, kind)
                    }
                    None => self.draw_empty_cell(&mut fb, start_x, start_y, x as u16, y as u16),
                }
            }
        }

        // Active piece on top.
        let piece = state.active();
        for (dx, dy, kind) in piece.shape().occupied() {
            let x = piece.x() + dx;
            let y = piece.y() + dy;
            if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
                self.draw_board_cell(&mut fb, start_x, start_y, x as u16, y as u16, kind);
            }
        }

        if let Some(text) = banner {
            self.draw_overlay_text(&mut fb, start_x, start_y, frame_w, frame_h, text);
        }

        // Controls hint under the frame.
        let hint = "←/→ move · ↓ drop · ↑/space rotate · q quit";
        let hint_style = CellStyle {
            fg: Rgb::new(130, 130, 140),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        };
        let hint_x = start_x + frame_w.saturating_sub(hint.chars().count() as u16) / 2;
        fb.put_str(hint_x, start_y + frame_h, hint, hint_style);

        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: PALETTE[0],
            bold: false,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = CellStyle {
            fg: piece_color(kind),
            bg: PALETTE[0],
            bold: true,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
