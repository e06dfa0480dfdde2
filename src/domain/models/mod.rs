pub mod config;
pub mod level;
pub mod record;

pub use config::{ConsoleConfig, LoggerConfig, RotationConfig, DEFAULT_TIME_FORMAT};
pub use level::Level;
pub use record::{FieldValue, Record, ERROR_FIELD};
