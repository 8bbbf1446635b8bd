//! A single history entry and its on-disk line format.
//!
//! Each line of the history file reads `"<timestamp>: <command>"`. Timestamps are
//! ISO-8601 (as written by this crate) or legacy epoch milliseconds. The stamp text
//! is kept verbatim so rewriting the file never alters entries it did not create.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

const SEPARATOR: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    stamp: String,
    command: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    ///
    /// Returns `None` when `command` is blank after trimming.
    #[must_use]
    pub fn now(command: &str) -> Option<Self> {
        Self::at(Utc::now(), command)
    }

    #[must_use]
    pub fn at(created: DateTime<Utc>, command: &str) -> Option<Self> {
        let command = normalize_command(command)?;
        Some(Self {
            stamp: created.to_rfc3339_opts(SecondsFormat::Millis, true),
            command,
        })
    }

    /// Parses one line of the history file.
    ///
    /// Lines whose command part is empty (including the `"\0"` placeholder written
    /// when the file is created) yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.split_once(SEPARATOR) {
            Some((stamp, rest)) if is_stamp(stamp) => Some(Self {
                stamp: stamp.to_string(),
                command: normalize_command(rest)?,
            }),
            _ => Some(Self {
                stamp: String::new(),
                command: normalize_command(line)?,
            }),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.stamp) {
            return Some(parsed.with_timezone(&Utc));
        }
        self.stamp
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    #[must_use]
    pub fn to_line(&self) -> String {
        if self.stamp.is_empty() {
            self.command.clone()
        } else {
            format!("{}{SEPARATOR}{}", self.stamp, self.command)
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

fn is_stamp(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    text.bytes().all(|b| b.is_ascii_digit()) || DateTime::parse_from_rfc3339(text).is_ok()
}

/// Trims whitespace and NUL padding; embedded line breaks would split the entry
/// across two lines on disk, so they become spaces.
fn normalize_command(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(['\n', '\r']) {
        Some(trimmed.replace(['\n', '\r'], " "))
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_iso_stamped_line() {
        let entry = HistoryEntry::parse("2023-06-01T12:00:00.000Z: AT+CFUN?").unwrap();
        assert_eq!(entry.stamp(), "2023-06-01T12:00:00.000Z");
        assert_eq!(entry.command(), "AT+CFUN?");
        assert_eq!(
            entry.timestamp(),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_legacy_epoch_stamp() {
        let entry = HistoryEntry::parse("1685620800000: reboot").unwrap();
        assert_eq!(entry.command(), "reboot");
        assert_eq!(
            entry.timestamp(),
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn keeps_separator_inside_command() {
        let entry = HistoryEntry::parse("2023-06-01T12:00:00.000Z: echo a: b").unwrap();
        assert_eq!(entry.command(), "echo a: b");
    }

    #[test]
    fn unstamped_line_is_all_command() {
        let entry = HistoryEntry::parse("log: level 3").unwrap();
        assert_eq!(entry.stamp(), "");
        assert_eq!(entry.command(), "log: level 3");
        assert_eq!(entry.to_line(), "log: level 3");
    }

    #[test]
    fn discards_placeholder_and_blank_lines() {
        assert!(HistoryEntry::parse("\0").is_none());
        assert!(HistoryEntry::parse("").is_none());
        assert!(HistoryEntry::parse("   ").is_none());
        assert!(HistoryEntry::parse("2023-06-01T12:00:00.000Z:  ").is_none());
    }

    #[test]
    fn stamp_is_preserved_verbatim() {
        let line = "2023-06-01T12:00:00+02:00: ls";
        assert_eq!(HistoryEntry::parse(line).unwrap().to_line(), line);
    }

    #[test]
    fn new_entry_uses_iso_stamp() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let entry = HistoryEntry::at(created, "  status \n").unwrap();
        assert_eq!(entry.to_line(), "2024-01-02T03:04:05.000Z: status");
    }

    #[test]
    fn embedded_newlines_become_spaces() {
        let entry = HistoryEntry::now("first\nsecond").unwrap();
        assert_eq!(entry.command(), "first second");
    }
}
