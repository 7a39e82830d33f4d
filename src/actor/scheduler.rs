//! Scheduler: decides which producer may touch the game state next.
//!
//! At most one producer holds a turn at a time, in either mode, so no
//! action is ever fetched while another producer could end the game.
//!
//! All coordination state lives behind one mutex and one condition
//! variable. Every change that could unblock somebody (turn advance, play
//! gate opening, stop latching) is broadcast, and every waiter re-checks
//! its own predicate after waking.
//!
//! ```text
//!           begin_play()            termination predicate / halt()
//!  WAITING ─────────────▶ RUNNING ─────────────────────────────────▶ STOPPED
//!     │                                                                 ▲
//!     └────────────────────────── halt() ───────────────────────────────┘
//! ```

use crate::game::PlayerId;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, trace};

/// Scheduling policy among input streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Streams take turns by ascending index, skipping exhausted ones.
    RoundRobin,
    /// Whichever stream asks first takes the next turn.
    #[default]
    FreeRace,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RoundRobin => "ROUND_ROBIN",
            Self::FreeRace => "FREE_RACE",
        })
    }
}

/// Error returned when parsing an unknown [`Mode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scheduling mode `{0}` (expected ROUND_ROBIN or FREE_RACE)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ROUND_ROBIN" => Ok(Self::RoundRobin),
            "FREE_RACE" => Ok(Self::FreeRace),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Answer to [`Scheduler::acquire_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The producer may submit one action.
    Granted,
    /// The game is over; the producer must not read its stream again.
    Stopped,
}

/// Why the game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every stream has delivered its `Exit`.
    Exhausted,
    /// The state reported a win.
    Won,
    /// Stopped from outside the turn protocol (worker failure).
    Halted,
}

#[derive(Debug)]
struct Inner {
    /// Next producer allowed to submit in round-robin mode.
    turn: usize,
    /// Producer currently holding a turn.
    holder: Option<PlayerId>,
    /// Per-stream flag, set once its first `Exit` has been taken.
    exhausted: Vec<bool>,
    /// Set once the initial frame is out.
    started: bool,
    /// Latched termination flag.
    stopped: Option<StopReason>,
}

impl Inner {
    fn all_exhausted(&self) -> bool {
        self.exhausted.iter().all(|&done| done)
    }

    /// Index of the first non-exhausted stream at or after `from`, wrapping.
    fn next_live(&self, from: usize) -> Option<usize> {
        let n = self.exhausted.len();
        (0..n).map(|k| (from + k) % n).find(|&i| !self.exhausted[i])
    }

    fn latch(&mut self, reason: StopReason) -> bool {
        if self.stopped.is_some() {
            return false;
        }
        self.stopped = Some(reason);
        true
    }
}

/// Turn arbiter shared by producers and the renderer.
#[derive(Debug)]
pub struct Scheduler {
    /// Scheduling policy.
    mode: Mode,
    /// Guarded coordination state.
    inner: Mutex<Inner>,
    /// Broadcast on every state change.
    changed: Condvar,
}

impl Scheduler {
    /// Create a scheduler for `streams` input streams, none exhausted yet.
    pub fn new(mode: Mode, streams: usize) -> Self {
        Self::resume(mode, vec![false; streams])
    }

    /// Create a scheduler that remembers which streams already ended.
    ///
    /// If every stream is exhausted the scheduler starts out stopped.
    pub fn resume(mode: Mode, exhausted: Vec<bool>) -> Self {
        let mut inner = Inner {
            turn: 0,
            holder: None,
            exhausted,
            started: false,
            stopped: None,
        };
        if inner.all_exhausted() {
            inner.stopped = Some(StopReason::Exhausted);
        } else if let Some(first) = inner.next_live(0) {
            inner.turn = first;
        }
        Self {
            mode,
            inner: Mutex::new(inner),
            changed: Condvar::new(),
        }
    }

    /// Open the play gate. Producers block in
    /// [`acquire_turn`](Self::acquire_turn) until this is called.
    pub fn begin_play(&self) {
        let mut inner = self.inner.lock();
        inner.started = true;
        debug!(mode = %self.mode, "play started");
        self.changed.notify_all();
    }

    /// Block until producer `id` may fetch and submit one action, or the
    /// game stops. The turn is held until [`release_turn`](Self::release_turn).
    pub fn acquire_turn(&self, id: PlayerId) -> Turn {
        let mut inner = self.inner.lock();
        loop {
            if inner.stopped.is_some() {
                return Turn::Stopped;
            }
            let permitted = match self.mode {
                Mode::FreeRace => true,
                Mode::RoundRobin => inner.turn == id,
            };
            if inner.started && inner.holder.is_none() && permitted {
                inner.holder = Some(id);
                return Turn::Granted;
            }
            self.changed.wait(&mut inner);
        }
    }

    /// Report that producer `id` finished processing one action.
    ///
    /// `was_exit` marks the stream exhausted; `won` is the state's win
    /// predicate evaluated right after the action.
    pub fn release_turn(&self, id: PlayerId, was_exit: bool, won: bool) {
        let mut inner = self.inner.lock();
        if inner.holder == Some(id) {
            inner.holder = None;
        }
        if was_exit {
            inner.exhausted[id] = true;
        }

        if self.mode == Mode::RoundRobin && inner.turn == id {
            let n = inner.exhausted.len();
            if let Some(next) = inner.next_live((id + 1) % n) {
                trace!(from = id, to = next, "turn advanced");
                inner.turn = next;
            }
        }

        let reason = if won {
            Some(StopReason::Won)
        } else if inner.all_exhausted() {
            Some(StopReason::Exhausted)
        } else {
            None
        };
        if let Some(reason) = reason {
            if inner.latch(reason) {
                debug!(?reason, producer = id, "game stopped");
            }
        }
        self.changed.notify_all();
    }

    /// Latch stop from outside the turn protocol and wake every waiter.
    ///
    /// Idempotent; the first reason wins.
    pub fn halt(&self, reason: StopReason) {
        let mut inner = self.inner.lock();
        if inner.latch(reason) {
            debug!(?reason, "game halted");
        }
        self.changed.notify_all();
    }

    /// Sleep until `deadline` or until the game stops.
    ///
    /// Returns whether the game has stopped.
    pub fn wait_for_frame(&self, deadline: Instant) -> bool {
        let mut inner = self.inner.lock();
        while inner.stopped.is_none() {
            if self.changed.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        inner.stopped.is_some()
    }

    /// Whether the game has stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.lock().stopped.is_some()
    }

    /// Why the game stopped, if it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.inner.lock().stopped
    }

    /// Whether stream `id` has delivered its `Exit`.
    pub fn is_exhausted(&self, id: PlayerId) -> bool {
        self.inner.lock().exhausted[id]
    }

    /// Snapshot of the per-stream exhausted flags.
    pub fn exhausted(&self) -> Vec<bool> {
        self.inner.lock().exhausted.clone()
    }
}

/// Latches stop if the owning thread unwinds, so nobody waits on a turn
/// or a play gate that will never come.
pub(crate) struct HaltOnPanic<'a>(pub(crate) &'a Scheduler);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.halt(StopReason::Halted);
        }
    }
}
