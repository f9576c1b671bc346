//! Line sinks for auction output
//!
//! The auction never decides where its text goes; it hands each line to a
//! [`ReportSink`].

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Destination for trade lines and reports
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink: Send {
    fn emit(&mut self, line: &str);
}

/// Writes every line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        // a closed pipe is not worth aborting a run over
        let _ = writeln!(out, "{}", line);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&mut self, _line: &str) {}
}

/// Captures lines in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line captured so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drain the captured lines
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer: Box<dyn ReportSink> = Box::new(sink.clone());
        writer.emit("A traded with B");

        assert_eq!(sink.lines(), vec!["A traded with B"]);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.lines().is_empty());
    }
}
