//! Terminal gridfall runner (default binary).
//!
//! Frame loop in three steps: render the current state, poll input with a
//! timeout bounded by the tick period, then advance the simulation with the
//! measured elapsed time. The simulation owns all drop timing; this loop only
//! feeds it deltas.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use gridfall::core::{GameEvent, GameState};
use gridfall::input::{handle_key_event, should_quit};
use gridfall::term::{GameView, TerminalRenderer, Viewport};
use gridfall::types::{GAME_OVER_BANNER_MS, TICK_MS};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Seed from the wall clock; the simulation itself is deterministic per seed.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut game = GameState::new(clock_seed());
    let view = GameView::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut banner_ms: u32 = 0;

    loop {
        // Game over is a notification, not a halt: show the banner for a
        // while and keep playing on the cleared board.
        if let Some(GameEvent::GameOver) = game.take_event() {
            banner_ms = GAME_OVER_BANNER_MS;
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let banner = (banner_ms > 0).then_some("GAME OVER");
        let fb = view.render(&game, Viewport::new(w, h), banner);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with measured elapsed time.
        if last_tick.elapsed() >= tick_duration {
            let elapsed_ms = last_tick.elapsed().as_millis() as u32;
            last_tick = Instant::now();
            game.tick(elapsed_ms);
            banner_ms = banner_ms.saturating_sub(elapsed_ms);
        }
    }
}
