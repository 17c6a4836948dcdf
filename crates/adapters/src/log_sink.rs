//! Line-oriented output sinks used by the text-based metric adapters.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A sink that receives pre-formatted, newline-terminated lines.
pub trait LogSink: Send + Sync {
    /// Write a line to the sink.
    fn write_line(&self, line: &str);
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            tracing::warn!(%error, "stderr metric line write failed");
        }
    }
}

/// Log sink that keeps every line in memory.
///
/// Useful for embedding the JSON-lines backend in tools that collect output
/// themselves.
#[derive(Debug, Default)]
pub struct BufferedLogSink {
    lines: Mutex<Vec<String>>,
}

impl BufferedLogSink {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain buffered lines in write order.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock_lines())
    }

    fn lock_lines(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for BufferedLogSink {
    fn write_line(&self, line: &str) {
        self.lock_lines().push(line.to_owned());
    }
}
