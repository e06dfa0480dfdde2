//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use teelog::{JsonSink, Level, Logger};

/// In-memory writer that can be read back while a sink still owns a clone
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("log output is UTF-8")
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// Parse every line as a JSON object
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).expect("line is valid JSON"))
            .collect()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Logger writing JSON lines into a buffer, with process exit disabled
pub fn json_logger(level: Level) -> (Logger, SharedBuffer) {
    let out = SharedBuffer::default();
    let logger = Logger::builder()
        .level(level)
        .sink(JsonSink::new(out.clone()))
        .exit_hook(|_| {})
        .build();
    (logger, out)
}

/// Drop the `time` key so records from different instants compare equal
pub fn without_time(mut record: serde_json::Value) -> serde_json::Value {
    if let Some(object) = record.as_object_mut() {
        object.remove("time");
    }
    record
}
