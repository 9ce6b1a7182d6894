//! Game state module - the active piece controller and drop timer
//!
//! Ties the core components together: board, shape library, and RNG. Owns the
//! falling piece and the accumulated drop time. All mutation goes through the
//! four operations (shift, rotate, drop, tick); rendering reads the state
//! through shared references and never mutates it.

use crate::core::{Board, Shape, SimpleRng};
use crate::types::{GameAction, BOARD_WIDTH, DROP_INTERVAL_MS};

/// The currently falling piece: a shape plus the board offset of its top-left
/// corner. Owned exclusively by [`GameState`]; replaced wholesale on spawn and
/// rotation, position mutated in place on shift/drop.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    shape: Shape,
    x: i8,
    y: i8,
}

impl ActivePiece {
    /// Place a shape at the spawn row, centered horizontally.
    fn at_spawn(shape: Shape) -> Self {
        let x = (BOARD_WIDTH / 2) as i8 - (shape.size() / 2) as i8;
        Self { shape, x, y: 0 }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }
}

/// Domain events surfaced to the host. Consumed with
/// [`GameState::take_event`]; the simulation never blocks on notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A freshly spawned piece collided immediately. The board has already
    /// been cleared and play continues.
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: ActivePiece,
    rng: SimpleRng,
    /// Milliseconds accumulated since the last drop (forced or player-made).
    drop_timer_ms: u32,
    /// Pending notification for the host, if any.
    last_event: Option<GameEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed and the first piece spawned.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        // A fresh board cannot block the spawn row, so the first piece is
        // placed directly.
        let active = ActivePiece::at_spawn(Shape::for_kind(rng.next_kind()));
        Self {
            board: Board::new(),
            active,
            rng,
            drop_timer_ms: 0,
            last_event: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    /// Take the pending event, leaving none. Host-side notification sink.
    pub fn take_event(&mut self) -> Option<GameEvent> {
        self.last_event.take()
    }

    /// Replace the active piece with a random fresh one at the spawn position.
    ///
    /// If the new piece collides immediately the game is over: the event is
    /// recorded for the host and the board resets to empty, with the same
    /// piece kept in play on the now-clear board.
    fn spawn(&mut self) {
        self.active = ActivePiece::at_spawn(Shape::for_kind(self.rng.next_kind()));
        if self
            .board
            .collides(&self.active.shape, self.active.x, self.active.y)
        {
            self.last_event = Some(GameEvent::GameOver);
            self.board.clear();
        }
    }

    /// Horizontal move, dir is -1 or +1. A blocked move is silently reverted.
    pub fn shift(&mut self, dir: i8) {
        self.active.x += dir;
        if self
            .board
            .collides(&self.active.shape, self.active.x, self.active.y)
        {
            self.active.x -= dir;
        }
    }

    /// Descend one row, locking on contact.
    ///
    /// On collision the move is reverted, the piece is merged at its last
    /// resting position, and a new piece spawns. Gravity and player soft drop
    /// both come through here, so both share identical lock semantics, and the
    /// drop timer restarts on every call regardless of branch.
    pub fn drop_piece(&mut self) {
        self.active.y += 1;
        if self
            .board
            .collides(&self.active.shape, self.active.x, self.active.y)
        {
            self.active.y -= 1;
            self.board
                .merge(&self.active.shape, self.active.x, self.active.y);
            self.spawn();
        }
        self.drop_timer_ms = 0;
    }

    /// Rotate 90 degrees clockwise in place, or not at all.
    ///
    /// The rotated shape is adopted only if it fits at the current position;
    /// there is no wall-kick offset search.
    pub fn rotate(&mut self) {
        let rotated = self.active.shape.rotated_cw();
        if !self.board.collides(&rotated, self.active.x, self.active.y) {
            self.active.shape = rotated;
        }
    }

    /// Advance the drop timer by measured elapsed time, forcing a drop once
    /// the accumulator exceeds the fixed interval. `drop_piece` owns the
    /// accumulator reset.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.drop_timer_ms += elapsed_ms;
        if self.drop_timer_ms > DROP_INTERVAL_MS {
            self.drop_piece();
        }
    }

    /// Map a player input onto the corresponding operation.
    pub fn apply_action(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft => self.shift(-1),
            GameAction::MoveRight => self.shift(1),
            GameAction::SoftDrop => self.drop_piece(),
            GameAction::Rotate => self.rotate(),
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, shape: Shape) {
        self.active = ActivePiece::at_spawn(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, BOARD_HEIGHT};

    fn occupied_board_cells(state: &GameState) -> usize {
        state.board.cells().iter().filter(|c| c.is_some()).count()
    }

    #[test]
    fn new_game_spawns_centered_at_top() {
        let state = GameState::new(1);
        let piece = state.active();
        assert_eq!(piece.y(), 0);
        // floor(10/2) - floor(n/2) for n in 2..=4 keeps x in 3..=4.
        assert!((3..=4).contains(&piece.x()));
        assert!(!state.board().collides(piece.shape(), piece.x(), piece.y()));
    }

    #[test]
    fn o_piece_spawns_at_x4() {
        let mut state = GameState::new(1);
        state.set_active(Shape::for_kind(PieceKind::O));
        assert_eq!(state.active().x(), 4);
        assert_eq!(state.active().y(), 0);
    }

    #[test]
    fn shift_then_unshift_restores_position() {
        let mut state = GameState::new(1);
        let x0 = state.active().x();
        state.shift(1);
        state.shift(-1);
        assert_eq!(state.active().x(), x0);
    }

    #[test]
    fn shift_into_left_wall_is_rejected() {
        let mut state = GameState::new(1);
        // Walk to the wall, then try to leave the board.
        for _ in 0..BOARD_WIDTH {
            state.shift(-1);
        }
        let at_wall = state.active().x();
        state.shift(-1);
        assert_eq!(state.active().x(), at_wall);
        // Every occupied cell is still inside the grid.
        let piece = state.active();
        for (dx, _, _) in piece.shape().occupied() {
            assert!(piece.x() + dx >= 0);
        }
    }

    #[test]
    fn drop_resets_timer_on_both_branches() {
        let mut state = GameState::new(1);
        state.tick(300);
        assert_eq!(state.drop_timer_ms(), 300);

        // Free fall: no lock, timer still resets.
        state.drop_piece();
        assert_eq!(state.drop_timer_ms(), 0);

        // Lock branch: drop to the floor, then once more.
        for _ in 0..BOARD_HEIGHT {
            state.drop_piece();
        }
        assert_eq!(state.drop_timer_ms(), 0);
    }

    #[test]
    fn gravity_forces_drop_only_past_interval() {
        let mut state = GameState::new(1);
        let y0 = state.active().y();

        state.tick(DROP_INTERVAL_MS);
        assert_eq!(state.active().y(), y0, "exactly the interval: no drop yet");

        state.tick(1);
        assert_eq!(state.active().y(), y0 + 1);
        assert_eq!(state.drop_timer_ms(), 0);
    }

    #[test]
    fn dropping_to_floor_locks_and_respawns() {
        let mut state = GameState::new(1);
        assert_eq!(occupied_board_cells(&state), 0);

        let mut drops = 0;
        while occupied_board_cells(&state) == 0 {
            state.drop_piece();
            drops += 1;
            assert!(drops <= BOARD_HEIGHT as u32 + 1, "piece never locked");
        }

        // Four cells locked into the board, fresh piece back at the top.
        assert_eq!(occupied_board_cells(&state), 4);
        assert_eq!(state.active().y(), 0);
        assert!(state.take_event().is_none());
    }

    #[test]
    fn lock_fills_gap_in_bottom_row_without_clearing_it() {
        let mut state = GameState::new(1);
        // Row 19 full except column 5.
        for x in 0..BOARD_WIDTH as i8 {
            if x != 5 {
                state.board_mut().set(x, 19, Some(PieceKind::L));
            }
        }
        // A vertical I is a single column of four cells at matrix x=2;
        // spawning at x=3 puts that column on board column 5.
        state.set_active(Shape::for_kind(PieceKind::I).rotated_cw());
        let piece = state.active();
        let columns: std::collections::HashSet<i8> = piece
            .shape()
            .occupied()
            .map(|(dx, _, _)| piece.x() + dx)
            .collect();
        assert_eq!(columns, std::collections::HashSet::from([5]));

        for _ in 0..=BOARD_HEIGHT {
            state.drop_piece();
        }

        // The column reached the floor: (5, 19) is filled, the row is now
        // fully occupied and stays that way. There is no line clear.
        for x in 0..BOARD_WIDTH as i8 {
            assert!(state.board().is_occupied(x, 19), "column {} empty", x);
        }
    }

    #[test]
    fn blocked_spawn_reports_game_over_and_clears_board() {
        let mut state = GameState::new(1);
        for x in 0..BOARD_WIDTH as i8 {
            for y in 0..BOARD_HEIGHT as i8 {
                state.board_mut().set(x, y, Some(PieceKind::Z));
            }
        }

        // Force a lock: the piece cannot descend, so the next drop merges and
        // respawns into the fully blocked board.
        state.drop_piece();

        assert_eq!(state.take_event(), Some(GameEvent::GameOver));
        assert!(state.board().cells().iter().all(|c| c.is_none()));
        // The event is consumed exactly once.
        assert_eq!(state.take_event(), None);
    }

    #[test]
    fn rotation_against_wall_is_reverted() {
        let mut state = GameState::new(1);
        state.set_active(Shape::for_kind(PieceKind::I));
        // Vertical I, then walk it flush against the left wall. Its only
        // occupied column is matrix x=2, so the piece offset ends at -2.
        state.rotate();
        for _ in 0..BOARD_WIDTH {
            state.shift(-1);
        }
        let vertical = state.active().shape().clone();
        let x_before = state.active().x();
        assert_eq!(x_before, -2);

        // Back to horizontal would reach board columns -2..=1: rejected, and
        // the rejection leaves shape and position untouched.
        state.rotate();
        assert_eq!(state.active().shape(), &vertical);
        assert_eq!(state.active().x(), x_before);
    }

    #[test]
    fn soft_drop_action_shares_drop_semantics() {
        let mut state = GameState::new(1);
        state.tick(400);
        let y0 = state.active().y();
        state.apply_action(GameAction::SoftDrop);
        assert_eq!(state.active().y(), y0 + 1);
        assert_eq!(state.drop_timer_ms(), 0, "player drop restarts gravity");
    }
}
