//! Single-line progress output.

use okoshi_generator::RetryObserver;
use std::io::{self, Stderr, Write};
use tracing::trace;

/// Writes an in-place status line: cumulative committed rows, plus transient
/// retry notices from unique columns.
///
/// Each message starts with `\r` and is padded to the longest message seen so
/// far, so a shorter line fully covers a longer one.
#[derive(Debug)]
pub struct ProgressReporter<W: Write = Stderr> {
    out: W,
    max_len: usize,
    committed: u64,
    retries: u64,
}

impl ProgressReporter<Stderr> {
    /// Report to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            max_len: 0,
            committed: 0,
            retries: 0,
        }
    }

    /// Record a committed chunk and show the running total.
    pub fn committed(&mut self, rows: u64) -> io::Result<()> {
        self.committed += rows;
        let total = self.committed;
        self.display(&total.to_string())
    }

    /// Rows reported as committed so far.
    pub fn total_committed(&self) -> u64 {
        self.committed
    }

    /// Uniqueness retries seen so far.
    pub fn total_retries(&self) -> u64 {
        self.retries
    }

    /// Overwrite the status line with `message`.
    pub fn display(&mut self, message: &str) -> io::Result<()> {
        self.max_len = self.max_len.max(message.len());
        write!(self.out, "\r{:<width$}", message, width = self.max_len)?;
        self.out.flush()
    }

    /// End the status line.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.max_len > 0 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RetryObserver for ProgressReporter<W> {
    fn on_retry(&mut self, column: &str, attempt: u64) {
        self.retries += 1;
        if let Err(e) = self.display(&format!("retry {attempt}/{column}")) {
            trace!("Failed to write retry status: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(reporter: ProgressReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_committed_is_cumulative() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.committed(20).unwrap();
        reporter.committed(20).unwrap();
        reporter.committed(5).unwrap();

        assert_eq!(reporter.total_committed(), 45);
        assert_eq!(output(reporter), "\r20\r40\r45");
    }

    #[test]
    fn test_shorter_message_is_padded() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.on_retry("code", 1);
        reporter.committed(5).unwrap();

        assert_eq!(reporter.total_retries(), 1);
        assert_eq!(output(reporter), format!("\rretry 1/code\r{:<12}", "5"));
    }

    #[test]
    fn test_finish_ends_line() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.finish().unwrap();
        reporter.committed(1).unwrap();
        reporter.finish().unwrap();

        assert_eq!(output(reporter), "\r1\n");
    }
}
