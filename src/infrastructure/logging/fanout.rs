//! Fan-out sink
//!
//! Every record goes to every child, independently. A failing child never
//! keeps the others from being written; the first error is reported after
//! all children were tried.

use std::io;
use std::sync::Arc;

use crate::domain::models::Record;
use crate::domain::ports::Sink;

/// Composite sink forwarding each record to all of its children
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child sink
    #[must_use]
    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.push(Arc::new(sink));
        self
    }

    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for FanOut {
    fn write_record(&self, record: &Record) -> io::Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.write_record(record) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> io::Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
