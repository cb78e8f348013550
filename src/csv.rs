//! CSV codec for the calorie log.
//!
//! Serializes the entry list to `Name,Calories,Time` rows and parses such
//! text back, honoring RFC4180 quoting: fields containing commas, quotes, or
//! newlines are double-quoted, embedded quotes are doubled. The parser is a
//! three-state machine so the quoting edge cases stay independently testable.

use crate::models::{Entry, UNNAMED_ITEM};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::fmt;

pub const HEADER: [&str; 3] = ["Name", "Calories", "Time"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    TooFewRows,
    MissingColumn(&'static str),
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    Calories {
        row: usize,
        value: String,
    },
    Time {
        row: usize,
        value: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRows => {
                write!(f, "file must contain a header row and at least one entry")
            }
            Self::MissingColumn(name) => write!(f, "missing required column '{name}'"),
            Self::FieldCount {
                row,
                expected,
                found,
            } => write!(f, "row {row}: expected {expected} fields, found {found}"),
            Self::Calories { row, value } => {
                write!(f, "row {row}: calories value '{value}' is not an integer")
            }
            Self::Time { row, value } => {
                write!(f, "row {row}: time value '{value}' is not a valid date")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders the entry list as CSV, in list order, one row per entry.
/// The output is the exact inverse of what [`parse_entries`] accepts.
pub fn serialize_entries(entries: &[Entry]) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push_str("\r\n");
    for entry in entries {
        out.push_str(&escape_field(&entry.name));
        out.push(',');
        out.push_str(&entry.calories.to_string());
        out.push(',');
        out.push_str(&escape_field(&format_time(entry.timestamp)));
        out.push_str("\r\n");
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        let mut quoted = String::with_capacity(field.len() + 2);
        quoted.push('"');
        for ch in field.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    } else {
        field.to_string()
    }
}

pub fn format_time(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp) {
        Some(time) => time.to_rfc3339_opts(SecondsFormat::Millis, true),
        // Out of chrono's range; the raw milliseconds still round-trip.
        None => timestamp.to_string(),
    }
}

/// Accepts RFC3339, naive date-times with `T` or space separators, bare
/// ISO dates (midnight UTC), and raw epoch milliseconds.
pub fn parse_time(raw: &str) -> Option<i64> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    raw.parse::<i64>().ok()
}

/// Parses CSV text into entries.
///
/// The header row is matched case-insensitively and order-independently
/// against `{name, calories, time}`. Rows whose cells are all blank are
/// skipped; rows with the wrong field count are rejected. The result is
/// sorted ascending by timestamp, ready to replace the current list.
pub fn parse_entries(input: &str) -> Result<Vec<Entry>, FormatError> {
    let rows = tokenize(input);
    if rows.len() < 2 {
        return Err(FormatError::TooFewRows);
    }

    let header = &rows[0];
    let name_idx = find_column(header, "name").ok_or(FormatError::MissingColumn("Name"))?;
    let calories_idx =
        find_column(header, "calories").ok_or(FormatError::MissingColumn("Calories"))?;
    let time_idx = find_column(header, "time").ok_or(FormatError::MissingColumn("Time"))?;

    let mut entries = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        let row_number = index + 1;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if row.len() != header.len() {
            return Err(FormatError::FieldCount {
                row: row_number,
                expected: header.len(),
                found: row.len(),
            });
        }

        let calories_raw = row[calories_idx].trim();
        let calories = calories_raw
            .parse::<i64>()
            .map_err(|_| FormatError::Calories {
                row: row_number,
                value: row[calories_idx].clone(),
            })?;
        let timestamp = parse_time(row[time_idx].trim()).ok_or_else(|| FormatError::Time {
            row: row_number,
            value: row[time_idx].clone(),
        })?;
        let name = if row[name_idx].trim().is_empty() {
            UNNAMED_ITEM.to_string()
        } else {
            row[name_idx].clone()
        };

        entries.push(Entry::new(&name, calories, timestamp));
    }

    entries.sort_by_key(|entry| entry.timestamp);
    Ok(entries)
}

fn find_column(header: &[String], wanted: &str) -> Option<usize> {
    header
        .iter()
        .position(|field| field.trim().eq_ignore_ascii_case(wanted))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
    AfterQuote,
}

/// Splits raw text into rows of fields. `\r\n`, `\r`, and `\n` all end a row
/// outside quotes; inside quotes every character is literal except `"`, where
/// a doubled quote yields one literal quote. A blank trailing row is dropped.
fn tokenize(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Unquoted => match ch {
                '"' if field.is_empty() => state = State::Quoted,
                ',' => row.push(std::mem::take(&mut field)),
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(ch),
            },
            State::Quoted => match ch {
                '"' => state = State::AfterQuote,
                _ => field.push(ch),
            },
            State::AfterQuote => match ch {
                '"' => {
                    field.push('"');
                    state = State::Quoted;
                }
                ',' => {
                    row.push(std::mem::take(&mut field));
                    state = State::Unquoted;
                }
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                    state = State::Unquoted;
                }
                // Stray text after a closing quote; keep it literal.
                _ => field.push(ch),
            },
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
