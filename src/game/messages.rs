//! Text shown around a replay.

/// Shown once, before the initial frame.
pub const GAME_READY_MESSAGE: &str = "Sokoban game is ready.";

/// Shown once, after the final frame.
pub const GAME_EXIT_MESSAGE: &str = "Game exits.";

/// Shown after [`GAME_EXIT_MESSAGE`] when the final state is a win.
pub const WIN_MESSAGE: &str = "You win.";

/// Undo quota line; `{}` is replaced by the remaining count.
pub const UNDO_QUOTA_TEMPLATE: &str = "Undo Quota: {}";

/// Undo quota line when undo is unlimited.
pub const UNDO_QUOTA_UNLIMITED: &str = "Undo Quota: unlimited";

/// Undo quota line for a frame.
pub fn undo_quota_text(quota: Option<u32>) -> String {
    quota.map_or_else(
        || UNDO_QUOTA_UNLIMITED.to_string(),
        |left| UNDO_QUOTA_TEMPLATE.replacen("{}", &left.to_string(), 1),
    )
}
