//! Terminal output: an ASCII [`Renderer`](crate::Renderer) for any
//! `Display`-able game state.

mod output;
mod renderer;

pub use output::FrameBuffer;
pub use renderer::TerminalRenderer;
