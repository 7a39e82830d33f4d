//! The renderer port.

use std::sync::Arc;

/// Display surface of a replay.
///
/// Frames come from the render thread only. Messages also come from
/// producer threads (reporting failed actions), so implementations must be
/// safe to share. The engine never calls `render` while an action is being
/// processed.
pub trait Renderer<S: ?Sized>: Sync {
    /// Draw one frame of `state`.
    fn render(&self, state: &S);

    /// Show a line of text.
    fn message(&self, text: &str);
}

impl<S: ?Sized, R: Renderer<S> + ?Sized> Renderer<S> for &R {
    fn render(&self, state: &S) {
        (**self).render(state);
    }

    fn message(&self, text: &str) {
        (**self).message(text);
    }
}

impl<S: ?Sized, R: Renderer<S> + Send + ?Sized> Renderer<S> for Arc<R> {
    fn render(&self, state: &S) {
        (**self).render(state);
    }

    fn message(&self, text: &str) {
        (**self).message(text);
    }
}
