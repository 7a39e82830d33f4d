//! Actor model: the threads that make up a replay.
//!
//! - **Producers**: one per input stream, apply recorded actions
//! - **Render loop**: samples the shared state at a fixed frame rate
//! - **Supervisor**: spawns everyone, joins everyone, reports errors
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  acquire/release  ┌───────────┐
//! │ Producer 0 │ ────────────────▶ │           │
//! └────────────┘                   │ Scheduler │ ◀── stop / pacing ──┐
//! ┌────────────┐  acquire/release  │           │                     │
//! │ Producer N │ ────────────────▶ │           │              ┌─────────────┐
//! └────────────┘                   └───────────┘              │ Render Loop │
//!       │ process_action                                      └─────────────┘
//!       ▼                                                            │ render
//! ┌──────────────────────────── Mutex<GameState> ◀───────────────────┘
//! ```

mod pacer;
mod producer;
mod renderer;
mod scheduler;
mod supervisor;


pub use pacer::FramePacer;
pub use producer::{Producer, ProducerStats};
pub use renderer::{RenderLoop, RenderStats};
pub use scheduler::{Mode, ParseModeError, Scheduler, StopReason, Turn};
pub use supervisor::{ReplayConfig, ReplayGame, ReplayReport};
