//! `TerminalRenderer`: prints frames and messages to a terminal.

use super::output::FrameBuffer;
use crate::game::Renderer;
use parking_lot::Mutex;
use std::fmt::Display;
use std::io::{self, Stdout, Write};
use tracing::warn;

struct Output<W> {
    /// Destination.
    writer: W,
    /// Frame being composed.
    frame: FrameBuffer,
    /// Messages shown since the last frame, redrawn above the next one.
    pending: Vec<String>,
    /// Whether each frame replaces the previous one on screen.
    clear: bool,
    /// Frames written so far.
    frames: u64,
}

impl<W: Write> Output<W> {
    fn draw<S: Display + ?Sized>(&mut self, state: &S) -> io::Result<()> {
        self.frame.clear();
        if self.clear {
            self.frame.clear_screen()?;
            for line in &self.pending {
                self.frame.write_line(line)?;
            }
        }
        self.pending.clear();
        self.frame.write_line(state)?;
        self.frame.flush_to(&mut self.writer)?;
        self.frames += 1;
        Ok(())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        self.pending.push(text.to_string());
        writeln!(self.writer, "{text}")?;
        self.writer.flush()
    }
}

/// Renderer that prints each frame as text.
///
/// The state is drawn with its `Display` impl. Messages are printed as they
/// arrive. With [`clearing`](Self::clearing) enabled every frame redraws the
/// screen, repeating the messages received since the previous frame above
/// the board.
pub struct TerminalRenderer<W: Write + Send> {
    output: Mutex<Output<W>>,
}

impl TerminalRenderer<Stdout> {
    /// Render to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Render to `writer`, appending frames one after another.
    pub fn new(writer: W) -> Self {
        Self {
            output: Mutex::new(Output {
                writer,
                frame: FrameBuffer::new(),
                pending: Vec::new(),
                clear: false,
                frames: 0,
            }),
        }
    }

    /// Clear the screen before every frame.
    #[must_use]
    pub fn clearing(self) -> Self {
        self.output.lock().clear = true;
        self
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.output.lock().frames
    }

    /// Get the writer back.
    pub fn into_inner(self) -> W {
        self.output.into_inner().writer
    }
}

impl<S, W> Renderer<S> for TerminalRenderer<W>
where
    S: Display + ?Sized,
    W: Write + Send,
{
    fn render(&self, state: &S) {
        if let Err(err) = self.output.lock().draw(state) {
            warn!(error = %err, "failed to draw frame");
        }
    }

    fn message(&self, text: &str) {
        if let Err(err) = self.output.lock().say(text) {
            warn!(error = %err, "failed to print message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(renderer: &TerminalRenderer<Vec<u8>>, board: &str) {
        Renderer::<str>::render(renderer, board);
    }

    fn message(renderer: &TerminalRenderer<Vec<u8>>, text: &str) {
        Renderer::<str>::message(renderer, text);
    }

    #[test]
    fn test_appending_output() {
        let renderer = TerminalRenderer::new(Vec::new());
        message(&renderer, "Undo Quota: 1");
        render(&renderer, "#@.#");
        message(&renderer, "Game exits.");

        assert_eq!(renderer.frames(), 1);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "Undo Quota: 1\n#@.#\nGame exits.\n");
    }

    #[test]
    fn test_clearing_output_repeats_pending_messages() {
        let renderer = TerminalRenderer::new(Vec::new()).clearing();
        message(&renderer, "Undo Quota: 1");
        render(&renderer, "#@.#");

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            text,
            "Undo Quota: 1\n\x1b[2J\x1b[1;1HUndo Quota: 1\n#@.#\n"
        );
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let renderer = TerminalRenderer::new(Closed);
        Renderer::<str>::message(&renderer, "hello");
        Renderer::<str>::render(&renderer, "#");
        assert_eq!(renderer.frames(), 0);
    }
}
