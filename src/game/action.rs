//! Action and result types routed through the replay engine.
//!
//! The engine treats actions as opaque values. The only thing it inspects is
//! whether an action is an [`Action::Exit`], which marks the end of a stream.

use std::fmt;

/// Index of the player (and of its input stream) that issued an action.
pub type PlayerId = usize;

/// Direction of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the top row.
    Up,
    /// Towards the bottom row.
    Down,
    /// Towards the first column.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Row and column offset of a single step.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// A single recorded unit of play.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the initiator's player one cell.
    Move {
        /// Player issuing the move.
        initiator: PlayerId,
        /// Where to move.
        direction: Direction,
    },

    /// Revert the last successful move.
    Undo {
        /// Player issuing the undo.
        initiator: PlayerId,
    },

    /// End of the initiator's stream.
    Exit {
        /// Player whose stream ended.
        initiator: PlayerId,
    },

    /// A recorded input that could not be understood.
    InvalidInput {
        /// Player whose stream contained the input.
        initiator: PlayerId,
        /// Description of what was wrong.
        message: String,
    },
}

impl Action {
    /// Create a move action.
    #[inline]
    pub const fn moving(initiator: PlayerId, direction: Direction) -> Self {
        Self::Move {
            initiator,
            direction,
        }
    }

    /// Create an undo action.
    #[inline]
    pub const fn undo(initiator: PlayerId) -> Self {
        Self::Undo { initiator }
    }

    /// Create an exit action.
    #[inline]
    pub const fn exit(initiator: PlayerId) -> Self {
        Self::Exit { initiator }
    }

    /// The player that issued this action.
    #[inline]
    pub const fn initiator(&self) -> PlayerId {
        match self {
            Self::Move { initiator, .. }
            | Self::Undo { initiator }
            | Self::Exit { initiator }
            | Self::InvalidInput { initiator, .. } => *initiator,
        }
    }

    /// Whether this action ends its stream.
    #[inline]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move {
                initiator,
                direction,
            } => write!(f, "{direction:?}({initiator})"),
            Self::Undo { initiator } => write!(f, "Undo({initiator})"),
            Self::Exit { initiator } => write!(f, "Exit({initiator})"),
            Self::InvalidInput { initiator, message } => {
                write!(f, "InvalidInput({initiator}: {message})")
            }
        }
    }
}

/// Outcome of applying an action to the game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The action took effect.
    Success,
    /// The action was rejected; the reason is shown to the user.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl ActionResult {
    /// Create a failed result.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// The failure reason, if the action was rejected.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiator_of_every_variant() {
        assert_eq!(Action::moving(3, Direction::Left).initiator(), 3);
        assert_eq!(Action::undo(1).initiator(), 1);
        assert_eq!(Action::exit(2).initiator(), 2);
        let invalid = Action::InvalidInput {
            initiator: 4,
            message: "?".to_string(),
        };
        assert_eq!(invalid.initiator(), 4);
    }

    #[test]
    fn test_only_exit_is_exit() {
        assert!(Action::exit(0).is_exit());
        assert!(!Action::undo(0).is_exit());
        assert!(!Action::moving(0, Direction::Up).is_exit());
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::moving(1, Direction::Right).to_string(), "Right(1)");
        assert_eq!(Action::exit(0).to_string(), "Exit(0)");
    }

    #[test]
    fn test_failure_reason() {
        assert_eq!(ActionResult::Success.failure(), None);
        assert_eq!(ActionResult::failed("wall").failure(), Some("wall"));
    }

    #[test]
    fn test_direction_offsets_cancel() {
        let (ur, uc) = Direction::Up.offset();
        let (dr, dc) = Direction::Down.offset();
        assert_eq!((ur + dr, uc + dc), (0, 0));
    }
}
