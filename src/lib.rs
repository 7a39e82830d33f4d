//! # Sokoban Replay
//!
//! A multi-threaded replay engine for recorded Sokoban sessions.
//!
//! Each recorded action stream is driven by its own producer thread into a
//! shared game state, while a dedicated render thread samples that state at
//! a fixed frame rate.
//!
//! ## Core Concepts
//!
//! - **Ports**: the game rules, the recorded inputs, and the display surface
//!   are traits ([`GameState`], [`InputStream`], [`Renderer`])
//! - **Scheduling modes**: [`Mode::RoundRobin`] takes turns by stream index,
//!   [`Mode::FreeRace`] lets streams race for the state
//! - **Paced rendering**: frames are aligned to a fixed epoch so the frame
//!   count tracks `elapsed × fps`
//!
//! ## Example
//!
//! ```rust,ignore
//! use replay::{Mode, ReplayConfig, ReplayGame, ScriptedInput, TerminalRenderer};
//!
//! let inputs = vec![Box::new(ScriptedInput::new(0, actions)) as Box<dyn replay::InputStream>];
//! let mut game = ReplayGame::new(
//!     ReplayConfig::new(Mode::RoundRobin, 30),
//!     state,
//!     inputs,
//!     TerminalRenderer::stdout(),
//! )?;
//! let report = game.run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod error;
pub mod game;
pub mod terminal;

// Re-exports for convenience
pub use actor::{Mode, ReplayConfig, ReplayGame, ReplayReport, StopReason};
pub use error::{BoxError, ReplayError, Result};
pub use game::{
    Action, ActionResult, Direction, GameState, InputStream, PlayerId, Renderer, ScriptedInput,
};
pub use terminal::TerminalRenderer;
