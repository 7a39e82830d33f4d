//! The input stream port and a scripted implementation.

use super::action::{Action, PlayerId};
use crate::error::BoxError;
use rand::Rng;
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::thread;
use std::time::Duration;

/// A finite, lazily read sequence of recorded actions.
///
/// The last action a stream yields is an [`Action::Exit`]. The engine never
/// calls [`fetch_action`](Self::fetch_action) again after receiving it.
pub trait InputStream: Send {
    /// Read the next recorded action.
    fn fetch_action(&mut self) -> Result<Action, BoxError>;
}

impl<T: InputStream + ?Sized> InputStream for Box<T> {
    fn fetch_action(&mut self) -> Result<Action, BoxError> {
        (**self).fetch_action()
    }
}

/// Input stream replaying a fixed list of actions.
///
/// Once the list runs out every fetch yields `Exit` for the stream's player,
/// so a script without an explicit `Exit` still terminates.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    /// Player the trailing `Exit` is attributed to.
    initiator: PlayerId,
    /// Actions not yet fetched.
    pending: VecDeque<Action>,
    /// Optional pause before each fetch, in milliseconds.
    delay_ms: Option<RangeInclusive<u64>>,
    /// Number of fetches served so far.
    fetched: usize,
}

impl ScriptedInput {
    /// Create a stream for `initiator` replaying `actions` in order.
    pub fn new(initiator: PlayerId, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            initiator,
            pending: actions.into_iter().collect(),
            delay_ms: None,
            fetched: 0,
        }
    }

    /// Pause for a random duration in `delay_ms` before every fetch.
    ///
    /// Simulates reading from a slow source.
    #[must_use]
    pub fn with_delay(mut self, delay_ms: RangeInclusive<u64>) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Number of fetches served so far.
    pub const fn fetched(&self) -> usize {
        self.fetched
    }

    /// Actions left before the implicit `Exit`.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl InputStream for ScriptedInput {
    fn fetch_action(&mut self) -> Result<Action, BoxError> {
        if let Some(range) = &self.delay_ms {
            let millis = rand::thread_rng().gen_range(range.clone());
            thread::sleep(Duration::from_millis(millis));
        }
        self.fetched += 1;
        Ok(self
            .pending
            .pop_front()
            .unwrap_or(Action::Exit {
                initiator: self.initiator,
            }))
    }
}
