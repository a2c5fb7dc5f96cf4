// Unit tests for timestamp tag extraction.
//
// Tests the tag grammar, the removal and spacing rules, the formatter
// contract and the identity/idempotence properties on untagged text.

use std::cell::Cell;

use chrono::{TimeZone, Utc};
use notifkit::body::format::{BodyFormatter, PlainFormatter};
use notifkit::body::timestamp::{
    extract_timestamp, extract_timestamp_plain, resolve_timestamp, ParsedBody,
};

// ============================================================
// Tag found
// ============================================================

#[test]
fn extracts_value_and_collapses_spaces() {
    let parsed = extract_timestamp_plain("Hello [timestamp:12345] world");
    assert_eq!(parsed.timestamp, "12345");
    assert_eq!(parsed.original_body, "Hello world");
    assert_eq!(parsed.notification_body, "Hello world");
}

#[test]
fn trailing_tag_is_removed_with_its_spaces() {
    let parsed = extract_timestamp_plain("Your swap settled  [timestamp:1700000000]");
    assert_eq!(parsed.timestamp, "1700000000");
    assert_eq!(parsed.original_body, "Your swap settled");
}

#[test]
fn empty_capture_yields_empty_timestamp() {
    let parsed = extract_timestamp_plain("gm [timestamp:] frens");
    assert_eq!(parsed.timestamp, "");
    assert_eq!(parsed.original_body, "gm frens");
}

#[test]
fn capture_stops_at_first_bracket() {
    let parsed = extract_timestamp_plain("a [timestamp:1] b [timestamp:2] c");
    assert_eq!(parsed.timestamp, "1");
}

#[test]
fn all_tags_are_removed() {
    let parsed = extract_timestamp_plain("a [timestamp:1] b [timestamp:2] c");
    assert_eq!(parsed.original_body, "a b c");
}

#[test]
fn tag_is_case_sensitive() {
    let parsed = extract_timestamp_plain("Hello [Timestamp:1] world");
    assert_eq!(parsed.timestamp, "");
    assert_eq!(parsed.original_body, "Hello [Timestamp:1] world");
}

#[test]
fn tag_cannot_span_lines() {
    let body = "Hello [timestamp:12\n34] world";
    let parsed = extract_timestamp_plain(body);
    assert_eq!(parsed.timestamp, "");
    assert_eq!(parsed.original_body, body);
}

#[test]
fn tag_only_body_becomes_empty() {
    let parsed = extract_timestamp_plain("[timestamp:42]");
    assert_eq!(parsed.timestamp, "42");
    assert_eq!(parsed.original_body, "");
    assert_eq!(parsed.notification_body, "");
}

// ============================================================
// No tag
// ============================================================

#[test]
fn untagged_body_is_unchanged() {
    let parsed = extract_timestamp_plain("no tag here");
    assert_eq!(parsed.timestamp, "");
    assert_eq!(parsed.original_body, "no tag here");
}

#[test]
fn empty_body_is_valid() {
    assert_eq!(extract_timestamp_plain(""), ParsedBody::default());
}

#[test]
fn untagged_input_is_identity() {
    let samples = [
        "",
        " ",
        "plain",
        "  leading and trailing  ",
        "[timestamp without colon]",
        "[timestamp:unterminated",
        "timestamp:123]",
        "multi\nline\r\nbody",
        "emoji 🚀 [not a tag]",
    ];
    for s in samples {
        assert_eq!(extract_timestamp_plain(s).original_body, s, "input {s:?}");
    }
}

#[test]
fn original_body_is_idempotent() {
    let samples = [
        "Hello [timestamp:12345] world",
        "[timestamp:1] start",
        "end [timestamp:1]",
        "a [timestamp:1] b [timestamp:2] c",
        "nothing here",
        "[times[timestamp:1]tamp:2]",
        "[timestamp:a[timestamp:b]",
        "keep [ti[timestamp:1]mestamp:[timestamp:2]2] this",
    ];
    for s in samples {
        let once = extract_timestamp_plain(s).original_body;
        let twice = extract_timestamp_plain(&once).original_body;
        assert_eq!(once, twice, "input {s:?}");
    }
}

#[test]
fn spliced_tag_is_removed_too() {
    let parsed = extract_timestamp_plain("[times[timestamp:1]tamp:2]");
    assert_eq!(parsed.timestamp, "1", "value comes from the first tag in the raw body");
    assert_eq!(parsed.original_body, "");
}

#[test]
fn tag_nested_in_tag_is_removed_whole() {
    let parsed = extract_timestamp_plain("[timestamp:a[timestamp:b]");
    assert_eq!(parsed.timestamp, "a[timestamp:b");
    assert_eq!(parsed.original_body, "");
}

// ============================================================
// Formatter contract
// ============================================================

#[test]
fn formatter_runs_once_on_stripped_text() {
    let calls = Cell::new(0);
    let seen = std::cell::RefCell::new(Vec::new());
    let formatter = |raw: &str| {
        calls.set(calls.get() + 1);
        seen.borrow_mut().push(raw.to_string());
        raw.to_uppercase()
    };

    let parsed = extract_timestamp("Hello [timestamp:9] world", &formatter);
    assert_eq!(calls.get(), 1);
    assert_eq!(seen.borrow().as_slice(), ["Hello world"]);
    assert_eq!(parsed.notification_body, "HELLO WORLD");
    assert_eq!(parsed.original_body, "Hello world");
}

#[test]
fn formatter_runs_once_without_tag() {
    let calls = Cell::new(0);
    let formatter = |raw: &str| {
        calls.set(calls.get() + 1);
        raw.to_string()
    };
    extract_timestamp("no tag", &formatter);
    assert_eq!(calls.get(), 1);
}

#[test]
fn original_body_is_not_formatted() {
    let parsed = extract_timestamp_plain("line  \r\nnext [timestamp:1]");
    assert_eq!(parsed.original_body, "line  \r\nnext");
    assert_eq!(parsed.notification_body, "line\nnext");
}

#[test]
fn plain_formatter_is_a_body_formatter() {
    fn takes<F: BodyFormatter>(f: &F) -> String {
        f.format("x \r\n")
    }
    assert_eq!(takes(&PlainFormatter), "x\n");
}

// ============================================================
// Timestamp resolution
// ============================================================

#[test]
fn resolves_unix_seconds() {
    let parsed = extract_timestamp_plain("Hi [timestamp:1700000000]");
    assert_eq!(
        parsed.sent_at(),
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
}

#[test]
fn resolves_unix_millis() {
    assert_eq!(
        resolve_timestamp("1700000000000"),
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
}

#[test]
fn resolves_fractional_seconds() {
    let t = resolve_timestamp("1700000000.5").unwrap();
    assert_eq!(t.timestamp_millis(), 1_700_000_000_500);
}

#[test]
fn resolves_rfc3339() {
    assert_eq!(
        resolve_timestamp("2024-01-02T03:04:05+01:00"),
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 2, 4, 5).unwrap())
    );
}

#[test]
fn unparseable_or_empty_timestamp_is_none() {
    assert_eq!(resolve_timestamp(""), None);
    assert_eq!(resolve_timestamp("yesterday"), None);
    assert_eq!(resolve_timestamp("NaN"), None);
    assert!(!extract_timestamp_plain("x [timestamp:] y").has_timestamp());
}

#[test]
fn serialized_shape_uses_camel_case_keys() {
    let json = serde_json::to_value(extract_timestamp_plain("a [timestamp:1] b")).unwrap();
    assert_eq!(json["notificationBody"], "a b");
    assert_eq!(json["timeStamp"], "1");
    assert_eq!(json["originalBody"], "a b");
}
