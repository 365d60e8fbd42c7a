//! Tracing setup.
//!
//! One-shot commands log to stderr. The console owns the terminal, so there
//! the fmt layer writes into a bounded in-memory buffer that the log panel
//! renders.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum log lines retained for the panel.
pub const MAX_LOG_LINES: usize = 500;

/// Shared, bounded log line buffer.
#[derive(Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // a panic while holding the lock leaves the lines usable
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lock();
        lines.push_back(line.into());
        while lines.len() > MAX_LOG_LINES {
            lines.pop_front();
        }
    }

    /// The newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let lines = self.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Writer handed out per event by [`LogBuffer`].
pub struct LogWriter {
    buffer: LogBuffer,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines() {
            let line = line.trim_end();
            if !line.is_empty() {
                self.buffer.push(line);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.clone(),
        }
    }
}

/// Install the global subscriber. With `panel` set, events go to the buffer
/// instead of stderr.
pub fn init(level: &str, panel: Option<LogBuffer>) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);

    let builder = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false);

    match panel {
        Some(buffer) => builder.with_ansi(false).with_writer(buffer).init(),
        None => builder.with_writer(io::stderr).init(),
    }
}
