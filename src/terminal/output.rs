//! `FrameBuffer`: single-write output buffer for one frame.

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::fmt::Display;
use std::io::{self, Write};

/// Pre-allocated buffer a frame is composed into.
///
/// Everything for a frame (clear sequence, message lines, board) is
/// accumulated here and handed to the terminal in one write, so a
/// half-drawn board is never visible.
#[derive(Debug)]
pub struct FrameBuffer {
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a new buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical board (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear the screen and move the cursor home.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.data, Clear(ClearType::All), MoveTo(0, 0))
    }

    /// Append `value` followed by a newline.
    pub fn write_line(&mut self, value: impl Display) -> io::Result<()> {
        writeln!(self.data, "{value}")
    }

    /// Flush to a writer in a single write.
    pub fn flush_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
