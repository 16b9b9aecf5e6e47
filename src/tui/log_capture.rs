//! Tracing capture for TUI mode.
//!
//! A ring buffer implementing `MakeWriter`, so tracing-subscriber writes log
//! lines here instead of stderr. Writing to stderr would corrupt the ratatui
//! alternate screen.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Ring capacity on the write path. The debug-log pane keeps its own larger
/// scroll history.
const RING_CAPACITY: usize = 256;

/// Thread-safe ring of formatted log lines.
///
/// `Clone` shares the underlying ring; `MakeWriter` needs to mint writers on
/// demand.
#[derive(Clone, Default)]
pub struct LogRing {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one line, evicting the oldest at capacity. A poisoned lock is
    /// recovered; logging must not cascade a panic.
    fn push(&self, line: String) {
        let mut ring = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if ring.len() >= RING_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(line);
    }

    /// Take all accumulated lines, oldest first.
    pub fn drain(&self) -> Vec<String> {
        let mut ring = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        ring.drain(..).collect()
    }
}

/// Writer that assembles complete lines and pushes them into the ring.
pub struct RingWriter {
    ring: LogRing,
    pending: Vec<u8>,
}

impl RingWriter {
    fn flush_complete_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            self.ring.push(text);
        }
    }
}

impl Write for RingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            let text = String::from_utf8_lossy(&self.pending).into_owned();
            self.ring.push(text);
            self.pending.clear();
        }
        Ok(())
    }
}

impl Drop for RingWriter {
    fn drop(&mut self) {
        let _ = Write::flush(self);
    }
}

impl<'a> MakeWriter<'a> for LogRing {
    type Writer = RingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RingWriter {
            ring: self.clone(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_lines_in_order() {
        let ring = LogRing::new();
        ring.push("first".to_string());
        ring.push("second".to_string());

        assert_eq!(ring.drain(), vec!["first", "second"]);
        assert!(ring.drain().is_empty());
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let ring = LogRing::new();
        for i in 0..RING_CAPACITY + 10 {
            ring.push(format!("line {}", i));
        }

        let lines = ring.drain();
        assert_eq!(lines.len(), RING_CAPACITY);
        assert_eq!(lines[0], "line 10");
    }

    #[test]
    fn test_writer_splits_lines_and_flushes_partials() {
        let ring = LogRing::new();
        {
            let mut writer = ring.make_writer();
            write!(writer, "alpha\nbeta\ngam").unwrap();
            assert_eq!(ring.drain(), vec!["alpha", "beta"]);
            // The partial line lands on drop.
        }
        assert_eq!(ring.drain(), vec!["gam"]);
    }
}
