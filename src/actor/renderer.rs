//! Render loop: the single thread that draws the game.
//!
//! The loop samples the shared state at a fixed rate. Each frame is taken
//! under the state lock, so a frame never overlaps an action. The lock is
//! released fairly between frames so busy producers cannot starve it.

use super::pacer::FramePacer;
use super::scheduler::{HaltOnPanic, Scheduler, StopReason};
use crate::game::messages::{undo_quota_text, GAME_EXIT_MESSAGE, GAME_READY_MESSAGE, WIN_MESSAGE};
use crate::game::{GameState, Renderer};
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Frame counters reported when the render loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames rendered, including the initial and final frames.
    pub frames: u64,
    /// Whether the final frame showed a win.
    pub won: bool,
}

/// Paced render loop over the shared state.
pub struct RenderLoop<'a, S, R: ?Sized> {
    /// Shared game state.
    state: &'a Mutex<S>,
    /// Turn arbiter, also the source of the stop signal.
    scheduler: &'a Scheduler,
    /// Display surface.
    renderer: &'a R,
    /// Time between frames.
    period: Duration,
}

impl<'a, S, R> RenderLoop<'a, S, R>
where
    S: GameState,
    R: Renderer<S> + ?Sized,
{
    /// Create a render loop drawing every `period`.
    pub const fn new(
        state: &'a Mutex<S>,
        scheduler: &'a Scheduler,
        renderer: &'a R,
        period: Duration,
    ) -> Self {
        Self {
            state,
            scheduler,
            renderer,
            period,
        }
    }

    /// Run until the game stops.
    ///
    /// Renders the initial state before opening the play gate, then one
    /// frame per period, then the final state followed by the exit banner
    /// (and the win banner if the final state is a win).
    pub fn run(self) -> RenderStats {
        let _halt = HaltOnPanic(self.scheduler);
        let mut stats = RenderStats::default();

        self.renderer.message(GAME_READY_MESSAGE);
        let mut pacer = FramePacer::new(self.period);
        self.tick(&mut stats);
        self.scheduler.begin_play();

        loop {
            let deadline = pacer.next_deadline();
            if self.scheduler.wait_for_frame(deadline) {
                break;
            }
            self.tick(&mut stats);
        }

        stats.won = self.frame();
        stats.frames += 1;
        self.renderer.message(GAME_EXIT_MESSAGE);
        if stats.won {
            self.renderer.message(WIN_MESSAGE);
        }

        debug!(frames = stats.frames, won = stats.won, "render loop finished");
        stats
    }

    /// Draw a frame while the game runs; a winning frame ends the game.
    fn tick(&self, stats: &mut RenderStats) {
        stats.frames += 1;
        if self.frame() {
            self.scheduler.halt(StopReason::Won);
        }
    }

    /// Draw one frame under the state lock. Returns the win predicate.
    fn frame(&self) -> bool {
        let state = self.state.lock();
        self.renderer.message(&undo_quota_text(state.undo_quota()));
        self.renderer.render(&state);
        let won = state.is_win();
        MutexGuard::unlock_fair(state);
        won
    }
}
