//! Error types for the replay engine.

use thiserror::Error;

/// Boxed error returned by the [`GameState`](crate::GameState) and
/// [`InputStream`](crate::InputStream) ports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias for results produced by the replay engine.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Everything that can end a replay abnormally.
///
/// `Failed` action results are not errors: they are reported to the
/// renderer and the replay carries on.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The game was constructed without any input stream.
    #[error("No input engine specified")]
    NoInputs,

    /// The configured frame rate cannot drive a render loop.
    #[error("invalid frame rate: {fps} (must be positive)")]
    InvalidFrameRate {
        /// The rejected frame rate.
        fps: u32,
    },

    /// An input stream failed to produce its next action.
    #[error("input stream {index} failed: {source}")]
    Stream {
        /// Index of the failing stream.
        index: usize,
        /// Error reported by the stream.
        #[source]
        source: BoxError,
    },

    /// The game state failed to apply an action.
    #[error("processing action from input stream {index} failed: {source}")]
    Action {
        /// Index of the stream whose action was being processed.
        index: usize,
        /// Error reported by the game state.
        #[source]
        source: BoxError,
    },

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A worker thread panicked.
    #[error("worker `{worker}` panicked")]
    WorkerPanicked {
        /// Name of the worker thread.
        worker: String,
    },
}

impl ReplayError {
    /// Whether this error was raised while validating the configuration,
    /// before any worker was started.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::NoInputs | Self::InvalidFrameRate { .. })
    }
}
