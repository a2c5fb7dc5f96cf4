// Timestamp tag extraction.
//
// Senders smuggle the send time into free text as `[timestamp:VALUE]`.
// The first tag's VALUE is reported; every tag is cut out of the body
// together with the spaces hugging it, and what is left goes through the
// formatter once.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::format::{BodyFormatter, PlainFormatter};

/// First tag, capturing everything up to the first `]` (non-greedy, no
/// line breaks).
static TIMESTAMP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[timestamp:(.*?)\]").expect("static pattern compiles"));

/// A tag plus the runs of spaces on either side. Same tag grammar as
/// TIMESTAMP_TAG so the reported value always belongs to a removed tag.
static TIMESTAMP_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\[timestamp:[^\]\n]*\] *").expect("static pattern compiles"));

/// Body text split into display text, timestamp and the untagged text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedBody {
    /// Formatted, display-ready text.
    #[serde(rename = "notificationBody")]
    pub notification_body: String,
    /// Raw VALUE of the first timestamp tag, or empty.
    #[serde(rename = "timeStamp")]
    pub timestamp: String,
    /// Text with the tags removed, before formatting. Equal to the input
    /// when no tag was present.
    #[serde(rename = "originalBody")]
    pub original_body: String,
}

impl ParsedBody {
    /// True when the body carried a timestamp tag with a non-empty value.
    pub fn has_timestamp(&self) -> bool {
        !self.timestamp.is_empty()
    }

    /// The timestamp resolved to a UTC time, if it parses.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        resolve_timestamp(&self.timestamp)
    }
}

/// Extract the timestamp tag from `body` and format the remaining text.
///
/// Total: every input, including the empty string, yields a `ParsedBody`.
/// `formatter` runs exactly once, on the text after tag removal.
pub fn extract_timestamp<F: BodyFormatter + ?Sized>(body: &str, formatter: &F) -> ParsedBody {
    let Some(caps) = TIMESTAMP_TAG.captures(body) else {
        return ParsedBody {
            notification_body: formatter.format(body),
            timestamp: String::new(),
            original_body: body.to_string(),
        };
    };

    let timestamp = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let stripped = strip_tags(body);

    ParsedBody {
        notification_body: formatter.format(&stripped),
        timestamp,
        original_body: stripped,
    }
}

/// `extract_timestamp` with the default `PlainFormatter`.
pub fn extract_timestamp_plain(body: &str) -> ParsedBody {
    extract_timestamp(body, &PlainFormatter)
}

/// Remove every tag run, left to right, non-overlapping.
///
/// A removed run that had spaces around it collapses to a single space
/// when it sat between two pieces of text, so `"Hello [timestamp:1] world"`
/// becomes `"Hello world"`. At either end of the text, or when the tag was
/// glued to its neighbours, it collapses to nothing.
///
/// Removal can splice the text around a tag into a fresh tag
/// (`[times[timestamp:1]tamp:2]`), so passes repeat until no tag is left.
/// Every pass that matches shrinks the text, so this terminates.
fn strip_tags(text: &str) -> String {
    let mut stripped = strip_pass(text);
    while TIMESTAMP_RUN.is_match(&stripped) {
        stripped = strip_pass(&stripped);
    }
    stripped
}

/// One left-to-right, non-overlapping removal pass.
fn strip_pass(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut separate = false;
    let mut last = 0;

    for m in TIMESTAMP_RUN.find_iter(text) {
        push_segment(&mut out, &text[last..m.start()], &mut separate);
        let run = m.as_str();
        if run.starts_with(' ') || run.ends_with(' ') {
            separate = true;
        }
        last = m.end();
    }
    push_segment(&mut out, &text[last..], &mut separate);

    out
}

fn push_segment(out: &mut String, segment: &str, separate: &mut bool) {
    if segment.is_empty() {
        return;
    }
    if *separate
        && !out.is_empty()
        && !out.ends_with(char::is_whitespace)
        && !segment.starts_with(char::is_whitespace)
    {
        out.push(' ');
    }
    *separate = false;
    out.push_str(segment);
}

/// Interpret a timestamp tag value as a point in time.
///
/// Integers of up to ten digits are unix seconds, longer ones unix
/// milliseconds. Fractional numbers are seconds. Anything else is tried
/// as RFC 3339.
pub fn resolve_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(n) = raw.parse::<i64>() {
        let digits = raw.trim_start_matches(['-', '+']).len();
        return if digits > 10 {
            DateTime::from_timestamp_millis(n)
        } else {
            DateTime::from_timestamp(n, 0)
        };
    }

    if let Ok(secs) = raw.parse::<f64>() {
        if secs.is_finite() && secs.abs() < i64::MAX as f64 / 1000.0 {
            return DateTime::from_timestamp_millis((secs * 1000.0).round() as i64);
        }
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
