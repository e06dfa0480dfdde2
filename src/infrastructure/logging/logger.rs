use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::console::ConsoleSink;
use super::event::Event;
use super::fanout::FanOut;
use super::flags::LogFlags;
use super::format::is_valid_time_format;
use super::json::JsonSink;
use super::rotation::{RotatingFile, RotationPolicy};
use crate::domain::models::{Level, LoggerConfig, Record, DEFAULT_TIME_FORMAT};
use crate::domain::ports::Sink;

type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit code used after a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Handle to a configured logger
///
/// Cloning is cheap and every clone shares the level, time format and
/// sinks, so one logger built at startup can be handed to every component
/// that logs. `set_level` on any clone is seen by all of them.
///
/// Logging calls never fail: sink errors are dropped.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Shared>,
}

struct Shared {
    level: AtomicU8,
    time_format: String,
    sink: FanOut,
    exit_hook: ExitHook,
}

impl Logger {
    /// Console plus rotating file logger, as configured at process start
    ///
    /// The minimum level is `debug` when the process was started with
    /// `--debug`, `info` otherwise. The file rotates at 100 MB, keeps 7
    /// compressed backups for up to 30 days, and is opened on first write.
    ///
    /// # Arguments
    /// * `path` - Rotating log file
    pub fn init(path: impl Into<PathBuf>) -> Self {
        Self::init_with_flags(path, LogFlags::from_env())
    }

    pub(crate) fn init_with_flags(path: impl Into<PathBuf>, flags: LogFlags) -> Self {
        Self::from_config(&init_config(path.into(), flags))
    }

    /// Build a logger from configuration
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut builder = Self::builder()
            .level(config.effective_level())
            .time_format(config.time_format.clone());

        if config.console.enabled {
            builder = builder.sink(ConsoleSink::stdout().with_color(config.console.color));
        }

        if let Some(path) = &config.file {
            let policy = RotationPolicy::from(&config.rotation);
            builder = builder.sink(JsonSink::new(RotatingFile::new(path, policy)));
        }

        builder.build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Change the minimum level for every clone of this logger
    pub fn set_level(&self, level: Level) {
        self.inner.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.inner.level.load(Ordering::Relaxed))
    }

    /// Whether a record at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        level.is_enabled_by(self.level())
    }

    pub fn time_format(&self) -> &str {
        &self.inner.time_format
    }

    pub fn debug(&self) -> Event<'_> {
        self.with_level(Level::Debug)
    }

    pub fn info(&self) -> Event<'_> {
        self.with_level(Level::Info)
    }

    pub fn warn(&self) -> Event<'_> {
        self.with_level(Level::Warn)
    }

    pub fn error(&self) -> Event<'_> {
        self.with_level(Level::Error)
    }

    /// Event at any level
    ///
    /// A `Fatal` event exits the process when finished and a `Panic` event
    /// panics, whether or not the record itself was written.
    pub fn with_level(&self, level: Level) -> Event<'_> {
        Event::new(self, level, self.enabled(level))
    }

    /// Same as [`Logger::infof`]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.infof(args);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.info().msgf(args);
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.debug().msgf(args);
    }

    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.warn().msgf(args);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.error().msgf(args);
    }

    /// Write a fatal record, flush every sink and exit with code 1
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.with_level(Level::Fatal).msgf(args);
    }

    /// Flush every sink, ignoring failures
    pub fn flush(&self) {
        if let Err(err) = self.inner.sink.flush() {
            debug!(error = %err, "failed to flush log sinks");
        }
    }

    pub(crate) fn write(&self, record: &Record) {
        if let Err(err) = self.inner.sink.write_record(record) {
            debug!(error = %err, level = %record.level, "dropped log record on failed sink");
        }
    }

    pub(crate) fn terminate(&self) {
        self.flush();
        (self.inner.exit_hook)(FATAL_EXIT_CODE);
    }
}

/// Settings behind [`Logger::init`]: console plus the default rotation policy
pub(crate) fn init_config(path: PathBuf, flags: LogFlags) -> LoggerConfig {
    LoggerConfig {
        file: Some(path),
        debug: flags.debug,
        ..LoggerConfig::default()
    }
}

impl Default for Logger {
    /// Console-only logger at `info`, for code running before setup
    fn default() -> Self {
        Self::builder().sink(ConsoleSink::stdout()).build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("time_format", &self.inner.time_format)
            .field("sink", &self.inner.sink)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Logger`] with explicit sinks
pub struct LoggerBuilder {
    level: Level,
    time_format: String,
    sink: FanOut,
    exit_hook: Option<ExitHook>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: Level::Info,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            sink: FanOut::new(),
            exit_hook: None,
        }
    }
}

impl LoggerBuilder {
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// strftime pattern for the `time` field; invalid patterns fall back to the default
    #[must_use]
    pub fn time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }

    /// Add a destination; records go to every sink added
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink.push(Arc::new(sink));
        self
    }

    /// Add a destination the caller keeps a handle to
    #[must_use]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink.push(sink);
        self
    }

    /// Replace process exit after fatal records
    #[must_use]
    pub fn exit_hook(mut self, hook: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit_hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Logger {
        let time_format = if is_valid_time_format(&self.time_format) {
            self.time_format
        } else {
            warn!(
                time_format = %self.time_format,
                "invalid time format, using default"
            );
            DEFAULT_TIME_FORMAT.to_string()
        };

        let exit_hook = self.exit_hook.unwrap_or_else(|| {
            let exit: ExitHook = Arc::new(|code: i32| std::process::exit(code));
            exit
        });

        Logger {
            inner: Arc::new(Shared {
                level: AtomicU8::new(self.level as u8),
                time_format,
                sink: self.sink,
                exit_hook,
            }),
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("level", &self.level)
            .field("time_format", &self.time_format)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
