//! The session value tree and its timestamp type.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// The top-level session payload: a mapping from string keys to values.
pub type SessionTree = BTreeMap<String, SessionValue>;

/// A point in time with second-or-better precision and an optional
/// timezone offset.
///
/// The two variants keep a naive timestamp distinguishable from a zoned
/// one, so the offset survives a round trip exactly when it was present
/// in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// A timestamp carrying an explicit UTC offset.
    Zoned(DateTime<FixedOffset>),
    /// A timestamp with no timezone information.
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Parses the textual wire form back into a timestamp.
    ///
    /// RFC 3339 text produces [`Timestamp::Zoned`]; text without an offset
    /// produces [`Timestamp::Naive`]. Anything else is a parse error.
    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(text) {
            Ok(dt) => Ok(Timestamp::Zoned(dt)),
            Err(_) => text.parse::<NaiveDateTime>().map(Timestamp::Naive),
        }
    }

    /// Renders the fully round-trippable textual form.
    ///
    /// Sub-second digits are emitted only when non-zero; the offset is
    /// emitted only for [`Timestamp::Zoned`].
    pub fn to_text(&self) -> String {
        match self {
            Timestamp::Zoned(dt) => dt.to_rfc3339(),
            Timestamp::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Zoned(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp::Naive(dt)
    }
}

/// One node of a session value tree.
///
/// A closed set of variants: conversion to and from the wire form is an
/// exhaustive match, so adding a variant forces the codec to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionValue {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A double-precision float.
    Float(f64),
    /// An ordinary string, escaped on render like any other.
    Text(String),
    /// A raw byte string.
    Bytes(Vec<u8>),
    /// A string pre-marked as safe for direct embedding in rendered
    /// output, exempt from escaping.
    Markup(String),
    /// A point-in-time value.
    Timestamp(Timestamp),
    /// An ordered sequence of values.
    Sequence(Vec<SessionValue>),
    /// A string-keyed mapping. `BTreeMap` keeps the encoding
    /// deterministic for a deterministic input tree.
    Mapping(BTreeMap<String, SessionValue>),
}

impl SessionValue {
    /// A safe-markup string.
    pub fn markup(content: impl Into<String>) -> Self {
        SessionValue::Markup(content.into())
    }

    /// A timestamp value.
    pub fn timestamp(ts: impl Into<Timestamp>) -> Self {
        SessionValue::Timestamp(ts.into())
    }

    /// An ordered sequence.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = SessionValue>,
    {
        SessionValue::Sequence(items.into_iter().collect())
    }

    /// A mapping built from key-value pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SessionValue)>,
    {
        SessionValue::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }
}

impl From<bool> for SessionValue {
    fn from(v: bool) -> Self {
        SessionValue::Bool(v)
    }
}

impl From<i64> for SessionValue {
    fn from(v: i64) -> Self {
        SessionValue::Integer(v)
    }
}

impl From<f64> for SessionValue {
    fn from(v: f64) -> Self {
        SessionValue::Float(v)
    }
}

impl From<&str> for SessionValue {
    fn from(v: &str) -> Self {
        SessionValue::Text(v.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(v: String) -> Self {
        SessionValue::Text(v)
    }
}

impl From<Vec<u8>> for SessionValue {
    fn from(v: Vec<u8>) -> Self {
        SessionValue::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoned_timestamp_text_round_trips() {
        let ts = Timestamp::parse("2024-01-15T10:30:00+02:00").unwrap();
        let text = ts.to_text();
        assert_eq!(text, "2024-01-15T10:30:00+02:00");
        assert_eq!(Timestamp::parse(&text).unwrap(), ts);
    }

    #[test]
    fn naive_timestamp_text_round_trips() {
        let ts = Timestamp::parse("2024-01-15T10:30:00").unwrap();
        assert!(matches!(ts, Timestamp::Naive(_)));
        assert_eq!(Timestamp::parse(&ts.to_text()).unwrap(), ts);
    }

    #[test]
    fn subsecond_precision_survives() {
        let ts = Timestamp::parse("2024-01-15T10:30:00.123456+00:00").unwrap();
        let text = ts.to_text();
        assert!(text.contains(".123456"));
        assert_eq!(Timestamp::parse(&text).unwrap(), ts);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn mapping_helper_builds_sorted_map() {
        let value =
            SessionValue::mapping([("b", SessionValue::from(1i64)), ("a", SessionValue::from(2i64))]);
        let SessionValue::Mapping(map) = value else {
            panic!("expected mapping");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
    }
}
