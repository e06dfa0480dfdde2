//! Implementation of the `teelog pipe` command.

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use super::emit::with_field;
use crate::domain::models::Level;
use crate::infrastructure::logging::Logger;

#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Level of every record
    #[arg(short, long, default_value_t = Level::Info)]
    pub level: Level,

    /// Structured field added to every record, repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Also write empty lines
    #[arg(long)]
    pub keep_empty: bool,
}

pub async fn execute(args: PipeArgs, logger: &Logger) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let count = forward_lines(stdin, &args, logger).await?;
    debug!(count, "stdin closed");
    Ok(())
}

/// Write one record per line of `reader`, returning how many were read
pub(crate) async fn forward_lines<R>(reader: R, args: &PipeArgs, logger: &Logger) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.is_empty() && !args.keep_empty {
            continue;
        }
        let mut event = logger.with_level(args.level);
        for field in &args.fields {
            event = with_field(event, field)?;
        }
        event.msg(&line);
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::JsonSink;
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

    #[tokio::test]
    async fn test_each_line_becomes_a_record() {
        let out = Shared::default();
        let logger = Logger::builder().sink(JsonSink::new(out.clone())).build();
        let args = PipeArgs {
            level: Level::Error,
            fields: vec!["src=stdin".to_string()],
            keep_empty: false,
        };

        let input: &[u8] = b"first\n\nsecond\n";
        let count = forward_lines(input, &args, &logger).await.unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let records: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["message"], "second");
        assert_eq!(records[1]["level"], "error");
        assert_eq!(records[0]["src"], "stdin");
    }
}
