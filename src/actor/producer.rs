//! Producer: one thread per input stream.
//!
//! A producer pulls actions from its stream and applies them to the shared
//! state, one per granted turn, until its first `Exit` or until the game
//! stops.

use super::scheduler::{HaltOnPanic, Scheduler, Turn};
use crate::error::ReplayError;
use crate::game::{GameState, InputStream, PlayerId, Renderer};
use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

/// Counters reported by a producer when it finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Actions passed to the game state.
    pub actions: u64,
    /// Actions the game state rejected.
    pub failures: u64,
}

impl std::ops::AddAssign for ProducerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.actions += rhs.actions;
        self.failures += rhs.failures;
    }
}

/// Drives one input stream into the shared game state.
pub struct Producer<'a, S, R: ?Sized, I: ?Sized> {
    /// Index of the stream (and of the player it records).
    index: PlayerId,
    /// The recorded stream.
    input: &'a mut I,
    /// Shared game state.
    state: &'a Mutex<S>,
    /// Turn arbiter.
    scheduler: &'a Scheduler,
    /// Destination for failure messages.
    renderer: &'a R,
}

impl<'a, S, R, I> Producer<'a, S, R, I>
where
    S: GameState,
    R: Renderer<S> + ?Sized,
    I: InputStream + ?Sized,
{
    /// Bind a producer to stream `index`.
    pub fn new(
        index: PlayerId,
        input: &'a mut I,
        state: &'a Mutex<S>,
        scheduler: &'a Scheduler,
        renderer: &'a R,
    ) -> Self {
        Self {
            index,
            input,
            state,
            scheduler,
            renderer,
        }
    }

    /// Replay the stream until its first `Exit` or until the game stops.
    ///
    /// Actions are applied in stream order, and every action fetched is
    /// applied. Nothing is read from the stream after its `Exit`.
    pub fn run(self) -> Result<ProducerStats, ReplayError> {
        let _halt = HaltOnPanic(self.scheduler);
        let mut stats = ProducerStats::default();

        if self.scheduler.is_exhausted(self.index) {
            debug!(producer = self.index, "stream already exhausted");
            return Ok(stats);
        }

        debug!(producer = self.index, "producer started");
        while self.scheduler.acquire_turn(self.index) == Turn::Granted {
            let action = self
                .input
                .fetch_action()
                .map_err(|source| ReplayError::Stream {
                    index: self.index,
                    source,
                })?;

            let mut state = self.state.lock();
            let result = state
                .process_action(&action)
                .map_err(|source| ReplayError::Action {
                    index: self.index,
                    source,
                })?;
            stats.actions += 1;
            if let Some(reason) = result.failure() {
                stats.failures += 1;
                self.renderer.message(reason);
            }

            // Released under the state lock so a win is latched before the
            // renderer can observe it.
            let was_exit = action.is_exit();
            self.scheduler
                .release_turn(self.index, was_exit, state.is_win());
            MutexGuard::unlock_fair(state);

            if was_exit {
                break;
            }
        }

        debug!(
            producer = self.index,
            actions = stats.actions,
            failures = stats.failures,
            "producer finished"
        );
        Ok(stats)
    }
}
