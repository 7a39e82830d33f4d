//! Supervisor: the entry point that runs a replay.
//!
//! `ReplayGame` owns the game state, the input streams, and the renderer. A
//! call to [`ReplayGame::run`] spawns one render thread and one producer
//! thread per stream, waits for all of them, and reports the first error
//! any of them hit.

use super::producer::{Producer, ProducerStats};
use super::renderer::{RenderLoop, RenderStats};
use super::scheduler::{Mode, Scheduler, StopReason};
use crate::error::{ReplayError, Result};
use crate::game::{GameState, InputStream, Renderer};
use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Name of the render thread.
const RENDER_THREAD: &str = "replay-render";

/// Configuration for a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayConfig {
    /// How turns are shared among input streams.
    pub mode: Mode,
    /// Target frames per second of the render loop.
    pub fps: u32,
}

impl ReplayConfig {
    /// Frame rate used when none is given.
    pub const DEFAULT_FRAME_RATE: u32 = 60;

    /// Create a configuration.
    pub const fn new(mode: Mode, fps: u32) -> Self {
        Self { mode, fps }
    }

    /// Time between two frames.
    ///
    /// Only meaningful for a validated configuration (`fps > 0`).
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(ReplayError::InvalidFrameRate { fps: self.fps });
        }
        Ok(())
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            fps: Self::DEFAULT_FRAME_RATE,
        }
    }
}

/// Summary of a finished replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Frames rendered, including the initial and final frames.
    pub frames: u64,
    /// Actions passed to the game state.
    pub actions: u64,
    /// Actions the game state rejected.
    pub failures: u64,
    /// Whether the final state is a win.
    pub won: bool,
    /// Why the game stopped.
    pub stop_reason: Option<StopReason>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// A replayable game session.
pub struct ReplayGame<S, R> {
    /// Configuration.
    config: ReplayConfig,
    /// Shared game state.
    state: Mutex<S>,
    /// One recorded stream per player.
    inputs: Vec<Box<dyn InputStream>>,
    /// Streams that already delivered their `Exit`, carried across runs.
    exhausted: Vec<bool>,
    /// Display surface.
    renderer: R,
}

impl<S, R> ReplayGame<S, R>
where
    S: GameState,
    R: Renderer<S>,
{
    /// Create a game.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoInputs`] when `inputs` is empty and
    /// [`ReplayError::InvalidFrameRate`] when `config.fps` is zero.
    pub fn new(
        config: ReplayConfig,
        state: S,
        inputs: Vec<Box<dyn InputStream>>,
        renderer: R,
    ) -> Result<Self> {
        if inputs.is_empty() {
            return Err(ReplayError::NoInputs);
        }
        config.validate()?;

        let exhausted = vec![false; inputs.len()];
        Ok(Self {
            config,
            state: Mutex::new(state),
            inputs,
            exhausted,
            renderer,
        })
    }

    /// Create a free-race game at the default frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoInputs`] when `inputs` is empty.
    pub fn with_defaults(
        state: S,
        inputs: Vec<Box<dyn InputStream>>,
        renderer: R,
    ) -> Result<Self> {
        Self::new(ReplayConfig::default(), state, inputs, renderer)
    }

    /// The game's configuration.
    pub const fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Lock and inspect the game state.
    pub fn state(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// The renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of input streams.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Give the game state back.
    pub fn into_state(self) -> S {
        self.state.into_inner()
    }

    /// Replay every input stream and wait for the game to end.
    ///
    /// The game ends when every stream has delivered its `Exit` or the state
    /// reports a win. Streams that ended in an earlier run are not read again.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any worker, after every worker has
    /// been joined.
    pub fn run(&mut self) -> Result<ReplayReport> {
        let Self {
            config,
            state,
            inputs,
            exhausted,
            renderer,
        } = self;

        let scheduler = Scheduler::resume(config.mode, exhausted.clone());
        let (error_tx, error_rx) = unbounded::<ReplayError>();
        let period = config.frame_period();
        let started = Instant::now();

        info!(
            mode = %config.mode,
            fps = config.fps,
            inputs = inputs.len(),
            "replay starting"
        );

        let (render_stats, totals) = thread::scope(|scope| {
            let scheduler = &scheduler;
            let state = &*state;
            let renderer = &*renderer;

            let render_tx = error_tx.clone();
            let render = thread::Builder::new()
                .name(RENDER_THREAD.to_string())
                .spawn_scoped(scope, move || {
                    let _report = ReportPanic::new(RENDER_THREAD, scheduler, &render_tx);
                    RenderLoop::new(state, scheduler, renderer, period).run()
                });
            let render = match render {
                Ok(handle) => Some(handle),
                Err(err) => {
                    report(scheduler, &error_tx, err.into());
                    None
                }
            };

            let mut producers = Vec::with_capacity(inputs.len());
            for (index, input) in inputs.iter_mut().enumerate() {
                let name = format!("replay-input-{index}");
                let worker_tx = error_tx.clone();
                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(scope, move || {
                        let _report = ReportPanic::new(&name, scheduler, &worker_tx);
                        Producer::new(index, input.as_mut(), state, scheduler, renderer)
                            .run()
                            .unwrap_or_else(|err| {
                                report(scheduler, &worker_tx, err);
                                ProducerStats::default()
                            })
                    });
                match spawned {
                    Ok(handle) => producers.push(handle),
                    Err(err) => {
                        report(scheduler, &error_tx, err.into());
                        break;
                    }
                }
            }

            // Panics were already reported by the unwinding worker.
            let mut totals = ProducerStats::default();
            for handle in producers {
                if let Ok(stats) = handle.join() {
                    totals += stats;
                }
            }
            let render_stats = render.and_then(|handle| handle.join().ok());

            (render_stats, totals)
        });

        *exhausted = scheduler.exhausted();

        if let Ok(err) = error_rx.try_recv() {
            warn!(error = %err, "replay failed");
            return Err(err);
        }

        let RenderStats { frames, won } = render_stats.unwrap_or_default();
        let report = ReplayReport {
            frames,
            actions: totals.actions,
            failures: totals.failures,
            won,
            stop_reason: scheduler.stop_reason(),
            elapsed: started.elapsed(),
        };
        info!(
            frames = report.frames,
            actions = report.actions,
            won = report.won,
            "replay finished"
        );
        Ok(report)
    }
}

/// Stop the game and hand `err` to the supervisor.
fn report(scheduler: &Scheduler, errors: &Sender<ReplayError>, err: ReplayError) {
    warn!(error = %err, "worker failed, stopping game");
    scheduler.halt(StopReason::Halted);
    // The receiver outlives every worker.
    let _ = errors.send(err);
}

/// Reports [`ReplayError::WorkerPanicked`] while the owning thread unwinds,
/// so a panic ranks against other errors by when it happened.
struct ReportPanic<'a> {
    worker: &'a str,
    scheduler: &'a Scheduler,
    errors: &'a Sender<ReplayError>,
}

impl<'a> ReportPanic<'a> {
    const fn new(
        worker: &'a str,
        scheduler: &'a Scheduler,
        errors: &'a Sender<ReplayError>,
    ) -> Self {
        Self {
            worker,
            scheduler,
            errors,
        }
    }
}

impl Drop for ReportPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            let worker = self.worker.to_string();
            report(self.scheduler, self.errors, ReplayError::WorkerPanicked { worker });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReplayConfig::default();
        assert_eq!(config.mode, Mode::FreeRace);
        assert_eq!(config.fps, 60);
        assert_eq!(
            ReplayConfig::new(Mode::RoundRobin, 50).frame_period(),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn test_zero_fps_rejected() {
        let config = ReplayConfig::new(Mode::FreeRace, 0);
        assert!(matches!(
            config.validate(),
            Err(ReplayError::InvalidFrameRate { fps: 0 })
        ));
    }

    #[test]
    fn test_panic_reported_before_join() {
        let scheduler = Scheduler::new(Mode::FreeRace, 2);
        let (errors, received) = unbounded();
        thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let _report = ReportPanic::new("replay-input-1", &scheduler, &errors);
                panic!("board on fire");
            });

            let first = received.recv_timeout(Duration::from_secs(5)).unwrap();
            report(
                &scheduler,
                &errors,
                ReplayError::Stream {
                    index: 0,
                    source: "late".into(),
                },
            );

            assert!(
                matches!(first, ReplayError::WorkerPanicked { ref worker } if worker == "replay-input-1"),
                "{first}"
            );
            assert!(handle.join().is_err());
        });
        assert_eq!(scheduler.stop_reason(), Some(StopReason::Halted));
        assert!(matches!(
            received.try_recv(),
            Ok(ReplayError::Stream { index: 0, .. })
        ));
    }
}
