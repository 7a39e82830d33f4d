//! The game state port.

use super::action::{Action, ActionResult};
use crate::error::BoxError;

/// Shared, mutable state of a Sokoban game.
///
/// The engine keeps the state behind a mutex. Producers mutate it only
/// through [`process_action`](Self::process_action) while holding their
/// turn; the renderer reads it between actions.
pub trait GameState: Send {
    /// Apply exactly one action.
    ///
    /// Rule violations are reported as [`ActionResult::Failed`] and do not
    /// stop the replay. An `Err` is treated as fatal for the whole game.
    /// Must not block.
    fn process_action(&mut self, action: &Action) -> Result<ActionResult, BoxError>;

    /// Whether every crate sits on a goal.
    fn is_win(&self) -> bool;

    /// Remaining undos, or `None` when undo is unlimited.
    fn undo_quota(&self) -> Option<u32>;
}
