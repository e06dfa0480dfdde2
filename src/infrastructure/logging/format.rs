//! Record rendering
//!
//! Two layouts share the same record: one JSON object per line for files,
//! and a human-readable, optionally colored line for the console.

use chrono::format::{Item, StrftimeItems};
use console::Style;
use serde::Serialize;
use std::fmt::Write;

use crate::domain::models::{FieldValue, Level, Record, ERROR_FIELD};

/// Whether `pattern` is a strftime pattern chrono can render.
pub fn is_valid_time_format(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Render a record as a single JSON line.
///
/// Key order is `level`, `time`, the fields in insertion order, then
/// `message`. `NoLevel` records carry no `level` key.
pub fn render_json(record: &Record) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    let mut first = true;
    out.push(b'{');

    if record.level != Level::NoLevel {
        push_key(&mut out, &mut first, "level");
        push_value(&mut out, record.level.as_str());
    }

    push_key(&mut out, &mut first, "time");
    push_value(&mut out, &record.time);

    for (key, value) in &record.fields {
        push_key(&mut out, &mut first, key);
        push_value(&mut out, value);
    }

    if let Some(message) = &record.message {
        push_key(&mut out, &mut first, "message");
        push_value(&mut out, message);
    }

    out.extend_from_slice(b"}\n");
    out
}

fn push_key(out: &mut Vec<u8>, first: &mut bool, key: &str) {
    if !*first {
        out.push(b',');
    }
    *first = false;
    push_value(out, key);
    out.push(b':');
}

fn push_value<T: Serialize + ?Sized>(out: &mut Vec<u8>, value: &T) {
    if serde_json::to_writer(&mut *out, value).is_err() {
        out.extend_from_slice(b"null");
    }
}

/// Styles for the console layout.
#[derive(Debug, Clone)]
struct Palette {
    time: Style,
    key: Style,
    error_value: Style,
}

impl Palette {
    fn new() -> Self {
        Self {
            time: Style::new().black().bright().force_styling(true),
            key: Style::new().cyan().force_styling(true),
            error_value: Style::new().red().force_styling(true),
        }
    }

    fn level(level: Level) -> Style {
        let style = match level {
            Level::Debug => Style::new().yellow(),
            Level::Info => Style::new().green(),
            Level::Warn => Style::new().red(),
            Level::Error | Level::Fatal | Level::Panic => Style::new().red().bold(),
            Level::NoLevel | Level::Disabled => Style::new().bold(),
        };
        style.force_styling(true)
    }
}

/// Render a record as one console line: `<time> <LVL> <message> key=value...`.
///
/// The file layout keeps insertion order; the console puts `error` first and
/// sorts the other keys.
pub fn render_console(record: &Record, color: bool) -> String {
    let palette = color.then(Palette::new);
    let mut line = String::with_capacity(96);

    match &palette {
        Some(p) => {
            let _ = write!(line, "{}", p.time.apply_to(&record.time));
        }
        None => line.push_str(&record.time),
    }

    line.push(' ');
    let tag = record.level.abbreviation();
    if palette.is_some() {
        let _ = write!(line, "{}", Palette::level(record.level).apply_to(tag));
    } else {
        line.push_str(tag);
    }

    if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
        line.push(' ');
        line.push_str(message);
    }

    for (key, value) in console_order(&record.fields) {
        line.push(' ');
        let value = console_value(value);
        match &palette {
            Some(p) => {
                let _ = write!(line, "{}=", p.key.apply_to(key));
                if key == ERROR_FIELD {
                    let _ = write!(line, "{}", p.error_value.apply_to(&value));
                } else {
                    line.push_str(&value);
                }
            }
            None => {
                let _ = write!(line, "{key}={value}");
            }
        }
    }

    line.push('\n');
    line
}

/// `error` first, then the remaining fields sorted by name
fn console_order(fields: &[(String, FieldValue)]) -> Vec<(&String, &FieldValue)> {
    let mut ordered: Vec<_> = fields.iter().map(|(key, value)| (key, value)).collect();
    ordered.sort_by(|(a, _), (b, _)| {
        (a.as_str() != ERROR_FIELD, a.as_str()).cmp(&(b.as_str() != ERROR_FIELD, b.as_str()))
    });
    ordered
}

fn console_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Str(s) if needs_quote(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn needs_quote(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        let mut record = Record::new(Level::Warn, "2024-05-01 10:20:30.456");
        record.fields.push(("user".to_string(), "alice".into()));
        record.fields.push(("attempt".to_string(), 3_i64.into()));
        record.message = Some("disk almost full".to_string());
        record
    }

    #[test]
    fn test_json_key_order() {
        let json = String::from_utf8(render_json(&record())).unwrap();
        assert_eq!(
            json,
            "{\"level\":\"warn\",\"time\":\"2024-05-01 10:20:30.456\",\"user\":\"alice\",\"attempt\":3,\"message\":\"disk almost full\"}\n"
        );
    }

    #[test]
    fn test_json_escapes_and_omits_nolevel() {
        let mut record = Record::new(Level::NoLevel, "t");
        record.message = Some("line \"one\"\nline two".to_string());
        let json = String::from_utf8(render_json(&record)).unwrap();
        assert_eq!(json.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("level").is_none());
        assert_eq!(value["message"], "line \"one\"\nline two");
    }

    #[test]
    fn test_json_without_message() {
        let record = Record::new(Level::Info, "t");
        let json = String::from_utf8(render_json(&record)).unwrap();
        assert_eq!(json, "{\"level\":\"info\",\"time\":\"t\"}\n");
    }

    #[test]
    fn test_console_plain_layout() {
        let line = render_console(&record(), false);
        assert_eq!(
            line,
            "2024-05-01 10:20:30.456 WRN disk almost full attempt=3 user=alice\n"
        );
    }

    #[test]
    fn test_console_puts_error_first_then_sorts_keys() {
        let mut record = Record::new(Level::Error, "t");
        record.fields.push(("zone".to_string(), "eu".into()));
        record.fields.push(("attempt".to_string(), 2_i64.into()));
        record.fields.push((ERROR_FIELD.to_string(), "refused".into()));
        record.fields.push(("host".to_string(), "db1".into()));

        let line = render_console(&record, false);
        assert_eq!(line, "t ERR error=refused attempt=2 host=db1 zone=eu\n");

        let json = String::from_utf8(render_json(&record)).unwrap();
        assert!(json.find("\"zone\"").unwrap() < json.find("\"attempt\"").unwrap());
    }

    #[test]
    fn test_console_quotes_values_with_spaces() {
        let mut record = Record::new(Level::Error, "t");
        record
            .fields
            .push((ERROR_FIELD.to_string(), "connection refused".into()));
        let line = render_console(&record, false);
        assert_eq!(line, "t ERR error=\"connection refused\"\n");
    }

    #[test]
    fn test_console_color_wraps_tag_in_ansi() {
        let line = render_console(&record(), true);
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("WRN"));
        assert!(line.contains("disk almost full"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_time_format_validation() {
        assert!(is_valid_time_format("%Y-%m-%d %H:%M:%S%.3f"));
        assert!(is_valid_time_format("%s"));
        assert!(!is_valid_time_format("%Q"));
        assert!(!is_valid_time_format(""));
    }
}
