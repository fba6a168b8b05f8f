//! The wire-side tree: what actually goes through MessagePack.
//!
//! `WireValue` has no special kinds; markup and timestamps have already
//! been folded into tagged envelopes by the time a tree reaches this
//! layer. Serde support is hand-written because the tree must accept any
//! self-describing MessagePack value on the way back in.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Discriminator tag for safe-markup envelopes.
pub(crate) const MARKUP_TAG: &str = "__markup__";
/// Discriminator tag for timestamp envelopes.
pub(crate) const DATETIME_TAG: &str = "__datetime__";
/// Envelope field holding the special value rendered as a plain string.
pub(crate) const CONTENT_KEY: &str = "content";
/// Envelope field holding the discriminator tag.
pub(crate) const TYPE_KEY: &str = "type";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WireValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bin(Vec<u8>),
    Seq(Vec<WireValue>),
    Map(BTreeMap<String, WireValue>),
}

impl WireValue {
    /// Builds the two-field envelope carrying a special value.
    pub(crate) fn envelope(tag: &str, content: String) -> WireValue {
        let mut map = BTreeMap::new();
        map.insert(CONTENT_KEY.to_string(), WireValue::Str(content));
        map.insert(TYPE_KEY.to_string(), WireValue::Str(tag.to_string()));
        WireValue::Map(map)
    }
}

impl Serialize for WireValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WireValue::Nil => serializer.serialize_unit(),
            WireValue::Bool(v) => serializer.serialize_bool(*v),
            WireValue::Int(v) => serializer.serialize_i64(*v),
            WireValue::Float(v) => serializer.serialize_f64(*v),
            WireValue::Str(v) => serializer.serialize_str(v),
            WireValue::Bin(v) => serializer.serialize_bytes(v),
            WireValue::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            WireValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct WireVisitor;

impl<'de> Visitor<'de> for WireVisitor {
    type Value = WireValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any session wire value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(WireValue::Nil)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(WireValue::Nil)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        WireValue::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(WireValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(WireValue::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(WireValue::Int)
            .map_err(|_| E::custom(format!("integer {v} out of range for a session value")))
    }

    fn visit_f32<E>(self, v: f32) -> Result<Self::Value, E> {
        Ok(WireValue::Float(f64::from(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(WireValue::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(WireValue::Str(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(WireValue::Str(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(WireValue::Bin(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(WireValue::Bin(v))
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element()? {
            items.push(item);
        }
        Ok(WireValue::Seq(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, WireValue>()? {
            entries.insert(key, value);
        }
        Ok(WireValue::Map(entries))
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor)
    }
}
