//! Structured JSON logger
//!
//! One log line = one event. Logs are synchronous and unbuffered, with
//! deterministic key ordering: `severity`, `event`, then the caller's
//! fields sorted by key. Values are JSON-escaped through serde_json.

use std::io::{self, Write};

use super::events::Event;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace,
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
}

impl Severity {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// Structured logger writing JSON lines to stdout.
pub struct Logger;

impl Logger {
    /// Logs an event at Info.
    pub fn info(event: Event, fields: &[(&str, String)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Logs an event at Warn.
    pub fn warn(event: Event, fields: &[(&str, String)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Logs an event with the given severity and fields.
    pub fn log(severity: Severity, event: Event, fields: &[(&str, String)]) {
        let mut stdout = io::stdout();
        // Best effort: a failed log write must not fail the operation.
        let _ = Self::write_line(&mut stdout, severity, event, fields);
    }

    fn write_line(
        writer: &mut impl Write,
        severity: Severity,
        event: Event,
        fields: &[(&str, String)],
    ) -> io::Result<()> {
        let mut sorted: Vec<&(&str, String)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = String::new();
        line.push_str("{\"severity\":");
        line.push_str(&serde_json::Value::from(severity.as_str()).to_string());
        line.push_str(",\"event\":");
        line.push_str(&serde_json::Value::from(event.as_str()).to_string());
        for (key, value) in sorted {
            line.push(',');
            line.push_str(&serde_json::Value::from(*key).to_string());
            line.push(':');
            line.push_str(&serde_json::Value::from(value.as_str()).to_string());
        }
        line.push('}');
        line.push('\n');

        writer.write_all(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(severity: Severity, event: Event, fields: &[(&str, String)]) -> String {
        let mut buf = Vec::new();
        Logger::write_line(&mut buf, severity, event, fields).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_fields_sorted_deterministically() {
        let line = render(
            Severity::Info,
            Event::Published,
            &[("version", "3".to_string()), ("site", "8080".to_string())],
        );
        assert_eq!(
            line,
            "{\"severity\":\"INFO\",\"event\":\"published\",\"site\":\"8080\",\"version\":\"3\"}\n"
        );
    }

    #[test]
    fn test_values_are_escaped() {
        let line = render(
            Severity::Warn,
            Event::JournalTruncated,
            &[("path", "a\"b".to_string())],
        );
        assert!(line.contains("a\\\"b"));
    }
}
