use std::fmt;
use std::io;
use std::sync::Arc;

use crate::domain::models::Record;

/// Port trait for log record destinations
///
/// A sink receives finalized [`Record`]s and renders them to wherever it
/// writes: the terminal, a rotating file, an in-memory buffer in tests.
/// Concrete implementations live in the infrastructure layer.
///
/// # Thread Safety
///
/// Sinks are shared by every clone of a logger and called from any thread.
/// An implementation must write one record with a single locked
/// `write_all` so that concurrent records never interleave.
///
/// # Errors
///
/// `write_record` and `flush` report I/O failures, but the logger
/// swallows them: a failing sink never turns into a failing log call.
///
/// # Examples
///
/// ```
/// use std::io;
/// use std::sync::Mutex;
/// use teelog::{Record, Sink};
///
/// #[derive(Debug, Default)]
/// struct CountingSink {
///     count: Mutex<usize>,
/// }
///
/// impl Sink for CountingSink {
///     fn write_record(&self, _record: &Record) -> io::Result<()> {
///         *self.count.lock().unwrap() += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Sink: Send + Sync + fmt::Debug {
    /// Render and write one record
    fn write_record(&self, record: &Record) -> io::Result<()>;

    /// Flush buffered output
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_record(&self, record: &Record) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_record(&self, record: &Record) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}
