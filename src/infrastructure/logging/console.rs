//! Console sink
//!
//! Human-readable, timestamp-prefixed lines, colored by default.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::format::render_console;
use crate::domain::models::Record;
use crate::domain::ports::Sink;

/// Sink writing console-formatted lines, stdout by default
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleSink {
    /// Colored output on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Colored output on any writer
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            color: true,
        }
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn write_record(&self, record: &Record) -> io::Result<()> {
        let line = render_console(record, self.color);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(line.as_bytes())?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Level;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let buffer = Shared::default();
        let sink = ConsoleSink::new(buffer.clone()).with_color(false);

        let mut record = Record::new(Level::Info, "2024-01-01 00:00:00.000");
        record.message = Some("started".to_string());
        sink.write_record(&record).unwrap();
        sink.write_record(&record).unwrap();

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            text,
            "2024-01-01 00:00:00.000 INF started\n2024-01-01 00:00:00.000 INF started\n"
        );
    }

    #[test]
    fn test_color_enabled_by_default() {
        assert!(ConsoleSink::stdout().color());
        assert!(!ConsoleSink::stdout().with_color(false).color());
    }
}
