use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::format::render_json;
use crate::domain::models::Record;
use crate::domain::ports::Sink;

/// Sink writing one JSON object per line
///
/// Wraps the rotating log file in production; any writer works.
pub struct JsonSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the wrapped writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the writer
    pub fn with_writer<T>(&self, f: impl FnOnce(&mut W) -> T) -> T {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut out)
    }
}

impl<W> fmt::Debug for JsonSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> Sink for JsonSink<W> {
    fn write_record(&self, record: &Record) -> io::Result<()> {
        let line = render_json(record);
        self.with_writer(|out| {
            out.write_all(&line)?;
            out.flush()
        })
    }

    fn flush(&self) -> io::Result<()> {
        self.with_writer(|out| out.flush())
    }
}
