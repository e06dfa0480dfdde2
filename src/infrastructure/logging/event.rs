use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::fmt::{self, Write};

use super::logger::Logger;
use crate::domain::models::{FieldValue, Level, Record, ERROR_FIELD};

/// Builder for one log record
///
/// Returned by [`Logger::debug`], [`Logger::info`] and friends, stamped with
/// the time of that call. Chain fields, then finish with [`Event::msg`],
/// [`Event::msgf`] or [`Event::send`]. When the level is suppressed the event
/// carries nothing and every call on it is a no-op.
///
/// # Examples
///
/// ```
/// use teelog::{Level, Logger};
///
/// let logger = Logger::builder().level(Level::Info).build();
/// logger
///     .info()
///     .str("user", "alice")
///     .int("attempt", 3)
///     .msg("login succeeded");
///
/// // Suppressed: nothing is allocated or written.
/// logger.debug().str("cache", "hit").send();
/// ```
#[must_use = "an event is only written once `msg`, `msgf` or `send` is called"]
pub struct Event<'a> {
    logger: &'a Logger,
    level: Level,
    pending: Option<Box<Pending>>,
}

struct Pending {
    at: DateTime<Local>,
    fields: Vec<(String, FieldValue)>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(logger: &'a Logger, level: Level, enabled: bool) -> Self {
        let pending = enabled.then(|| {
            Box::new(Pending {
                at: Local::now(),
                fields: Vec::new(),
            })
        });
        Self {
            logger,
            level,
            pending,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether finishing this event writes a record
    pub fn enabled(&self) -> bool {
        self.pending.is_some()
    }

    fn push(mut self, key: &str, value: impl FnOnce() -> FieldValue) -> Self {
        if let Some(pending) = self.pending.as_mut() {
            pending.fields.push((key.to_string(), value()));
        }
        self
    }

    pub fn str(self, key: &str, value: impl AsRef<str>) -> Self {
        self.push(key, || FieldValue::Str(value.as_ref().to_string()))
    }

    pub fn int(self, key: &str, value: i64) -> Self {
        self.push(key, || FieldValue::Int(value))
    }

    pub fn uint(self, key: &str, value: u64) -> Self {
        self.push(key, || FieldValue::Uint(value))
    }

    pub fn float(self, key: &str, value: f64) -> Self {
        self.push(key, || FieldValue::Float(value))
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.push(key, || FieldValue::Bool(value))
    }

    /// Attach an error under the `error` key
    pub fn err(self, err: &dyn Error) -> Self {
        self.push(ERROR_FIELD, || FieldValue::Str(err.to_string()))
    }

    /// Attach any serializable value as JSON
    ///
    /// A value that fails to serialize is recorded as its error message.
    pub fn field<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        self.push(key, || {
            serde_json::to_value(value)
                .map_or_else(|err| FieldValue::Str(err.to_string()), FieldValue::Json)
        })
    }

    /// Write the record with `message`
    ///
    /// # Panics
    /// Panics with `message` after writing when the level is [`Level::Panic`].
    pub fn msg(self, message: &str) {
        let needs_message = self.pending.is_some() || self.level == Level::Panic;
        self.finish(needs_message.then(|| message.to_string()));
    }

    /// Write the record with a formatted message
    ///
    /// The arguments are only rendered when the record is written.
    ///
    /// # Panics
    /// Panics with the message after writing when the level is [`Level::Panic`].
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        let needs_message = self.pending.is_some() || self.level == Level::Panic;
        self.finish(needs_message.then(|| fmt::format(args)));
    }

    /// Write the record without a message
    ///
    /// # Panics
    /// Panics after writing when the level is [`Level::Panic`].
    pub fn send(self) {
        self.finish(None);
    }

    fn finish(self, message: Option<String>) {
        let Self {
            logger,
            level,
            pending,
        } = self;

        if let Some(pending) = pending {
            let mut time = String::new();
            let _ = write!(time, "{}", pending.at.format(logger.time_format()));
            logger.write(&Record {
                level,
                time,
                fields: pending.fields,
                message: message.clone(),
            });
        }

        match level {
            Level::Fatal => logger.terminate(),
            Level::Panic => panic!("{}", message.unwrap_or_default()),
            _ => {}
        }
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("enabled", &self.enabled())
            .finish_non_exhaustive()
    }
}
