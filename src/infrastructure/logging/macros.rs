//! printf-style helpers
//!
//! Each macro takes a [`Logger`](crate::Logger) followed by `format!`
//! arguments. Formatting only happens when the record is written.

/// Log a formatted message at `info`
///
/// ```
/// let logger = teelog::Logger::builder().build();
/// teelog::printf!(logger, "listening on {}:{}", "0.0.0.0", 8080);
/// ```
#[macro_export]
macro_rules! printf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.printf(::core::format_args!($($arg)+))
    };
}

/// Log a formatted message at `info`
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::core::format_args!($($arg)+))
    };
}

/// Log a formatted message at `debug`
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::core::format_args!($($arg)+))
    };
}

/// Log a formatted message at `warn`
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::core::format_args!($($arg)+))
    };
}

/// Log a formatted message at `error`
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::core::format_args!($($arg)+))
    };
}

/// Log a formatted message at `fatal`, then exit the process with code 1
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::core::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::models::Level;
    use crate::infrastructure::logging::{JsonSink, Logger};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_macros_forward_to_logger() {
        let out = Shared::default();
        let logger = Logger::builder()
            .level(Level::Debug)
            .sink(JsonSink::new(out.clone()))
            .build();

        printf!(logger, "a{}", 1);
        infof!(logger, "b{}", 2);
        debugf!(logger, "c");
        warnf!(logger, "{:>3}", "d");
        errorf!(logger, "{x}", x = "e");

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let messages: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["message"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(messages, ["a1", "b2", "c", "  d", "e"]);
    }
}
