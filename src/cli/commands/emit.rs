//! Implementation of the `teelog emit` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::Level;
use crate::infrastructure::logging::{Event, Logger};

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Level of the record
    #[arg(short, long, default_value_t = Level::Info)]
    pub level: Level,

    /// Structured field, repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Message words, joined with spaces
    #[arg(required = true)]
    pub message: Vec<String>,
}

pub fn execute(args: EmitArgs, logger: &Logger) -> Result<()> {
    let mut event = logger.with_level(args.level);
    for field in &args.fields {
        event = with_field(event, field)?;
    }
    event.msg(&args.message.join(" "));
    Ok(())
}

/// Attach `key=value`, typed as an integer, finite float or boolean when it parses as one
pub(crate) fn with_field<'a>(event: Event<'a>, field: &str) -> Result<Event<'a>> {
    let (key, value) = field
        .split_once('=')
        .with_context(|| format!("Invalid field {field:?}, expected KEY=VALUE"))?;
    if key.is_empty() {
        anyhow::bail!("Invalid field {field:?}, key cannot be empty");
    }

    let event = if let Ok(n) = value.parse::<i64>() {
        event.int(key, n)
    } else if let Some(x) = value.parse::<f64>().ok().filter(|x| x.is_finite()) {
        event.float(key, x)
    } else if let Ok(b) = value.parse::<bool>() {
        event.bool(key, b)
    } else {
        event.str(key, value)
    };
    Ok(event)
}
