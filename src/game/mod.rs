//! Game ports: the collaborators the replay engine drives.
//!
//! The engine never looks inside the game. It talks to three ports:
//! - [`GameState`]: owns the grid, applies actions, reports wins and undo quota
//! - [`InputStream`]: a recorded, finite sequence of [`Action`]s ending in `Exit`
//! - [`Renderer`]: the display surface receiving frames and text messages
//!
//! The [`messages`] module holds the literal strings shown around a replay.

mod action;
mod input;
pub mod messages;
mod render;
mod state;

pub use action::{Action, ActionResult, Direction, PlayerId};
pub use input::{InputStream, ScriptedInput};
pub use render::Renderer;
pub use state::GameState;
