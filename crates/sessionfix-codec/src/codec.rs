//! The tag-and-wrap / detect-and-unwrap codec.

use std::collections::BTreeMap;

use sessionfix_core::{SessionFixError, SessionFixResult};

use crate::value::{SessionTree, SessionValue, Timestamp};
use crate::wire::{WireValue, CONTENT_KEY, DATETIME_TAG, MARKUP_TAG, TYPE_KEY};

/// Bidirectional transform between a [`SessionTree`] and a MessagePack
/// blob.
///
/// MessagePack has no native representation for safe-markup strings or
/// timestamps, so the encoder replaces each with a two-field envelope
/// (`content` + `type`) and the decoder reconstructs them from it. The
/// codec holds no state; one instance can serve every request.
///
/// Known limitation, carried over rather than guarded: application data
/// that stores a `type` key whose value is exactly one of the
/// discriminator tags, next to a string `content`, is unwrapped as a
/// special value on decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgpackCodec;

impl MsgpackCodec {
    /// Creates the codec.
    pub fn new() -> Self {
        Self
    }

    /// Encodes a session tree into a MessagePack blob.
    ///
    /// Deterministic for a deterministic input tree and infallible for
    /// trees built from the supported variants; the error path exists
    /// only for the underlying writer.
    pub fn encode(&self, tree: &SessionTree) -> SessionFixResult<Vec<u8>> {
        let wire = WireValue::Map(
            tree.iter()
                .map(|(key, value)| (key.clone(), to_wire(value)))
                .collect(),
        );
        Ok(rmp_serde::to_vec(&wire)?)
    }

    /// Decodes a MessagePack blob back into a session tree.
    ///
    /// A corrupt or truncated blob fails with
    /// [`SessionFixError::Decode`]; a timestamp envelope with unparseable
    /// `content` fails with [`SessionFixError::TimestampParse`]. Neither
    /// is recovered here.
    pub fn decode(&self, blob: &[u8]) -> SessionFixResult<SessionTree> {
        let wire: WireValue = rmp_serde::from_slice(blob)?;
        let WireValue::Map(entries) = wire else {
            return Err(SessionFixError::Session(
                "session payload root is not a mapping".to_string(),
            ));
        };
        entries
            .into_iter()
            .map(|(key, value)| Ok((key, from_wire(value)?)))
            .collect()
    }
}

fn to_wire(value: &SessionValue) -> WireValue {
    match value {
        SessionValue::Null => WireValue::Nil,
        SessionValue::Bool(v) => WireValue::Bool(*v),
        SessionValue::Integer(v) => WireValue::Int(*v),
        SessionValue::Float(v) => WireValue::Float(*v),
        SessionValue::Text(v) => WireValue::Str(v.clone()),
        SessionValue::Bytes(v) => WireValue::Bin(v.clone()),
        SessionValue::Markup(v) => WireValue::envelope(MARKUP_TAG, v.clone()),
        SessionValue::Timestamp(ts) => WireValue::envelope(DATETIME_TAG, ts.to_text()),
        SessionValue::Sequence(items) => WireValue::Seq(items.iter().map(to_wire).collect()),
        SessionValue::Mapping(entries) => WireValue::Map(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_wire(value)))
                .collect(),
        ),
    }
}

fn from_wire(wire: WireValue) -> SessionFixResult<SessionValue> {
    Ok(match wire {
        WireValue::Nil => SessionValue::Null,
        WireValue::Bool(v) => SessionValue::Bool(v),
        WireValue::Int(v) => SessionValue::Integer(v),
        WireValue::Float(v) => SessionValue::Float(v),
        WireValue::Str(v) => SessionValue::Text(v),
        WireValue::Bin(v) => SessionValue::Bytes(v),
        WireValue::Seq(items) => SessionValue::Sequence(
            items
                .into_iter()
                .map(from_wire)
                .collect::<SessionFixResult<_>>()?,
        ),
        WireValue::Map(entries) => unwrap_map(entries)?,
    })
}

/// Only a well-formed envelope (a recognized tag and a string `content`)
/// is unwrapped; every other mapping stays a mapping and recurses.
fn unwrap_map(entries: BTreeMap<String, WireValue>) -> SessionFixResult<SessionValue> {
    if let (Some(WireValue::Str(tag)), Some(WireValue::Str(content))) =
        (entries.get(TYPE_KEY), entries.get(CONTENT_KEY))
    {
        match tag.as_str() {
            MARKUP_TAG => return Ok(SessionValue::Markup(content.clone())),
            DATETIME_TAG => return Ok(SessionValue::Timestamp(Timestamp::parse(content)?)),
            _ => {}
        }
    }
    Ok(SessionValue::Mapping(
        entries
            .into_iter()
            .map(|(key, value)| Ok((key, from_wire(value)?)))
            .collect::<SessionFixResult<_>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(entries: Vec<(&str, SessionValue)>) -> SessionTree {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn encode_is_deterministic() {
        let codec = MsgpackCodec::new();
        let tree = tree(vec![
            ("b", SessionValue::from("two")),
            ("a", SessionValue::from(1i64)),
        ]);
        assert_eq!(codec.encode(&tree).unwrap(), codec.encode(&tree).unwrap());
    }

    #[test]
    fn markup_becomes_an_envelope_on_the_wire() {
        let codec = MsgpackCodec::new();
        let blob = codec
            .encode(&tree(vec![("flash", SessionValue::markup("<b>Hi</b>"))]))
            .unwrap();

        let wire: WireValue = rmp_serde::from_slice(&blob).unwrap();
        let WireValue::Map(root) = wire else {
            panic!("root must be a map");
        };
        let expected = WireValue::envelope(MARKUP_TAG, "<b>Hi</b>".to_string());
        assert_eq!(root.get("flash"), Some(&expected));
    }

    #[test]
    fn plain_mapping_is_never_wrapped() {
        let codec = MsgpackCodec::new();
        let input = tree(vec![(
            "data",
            SessionValue::mapping([("type", SessionValue::from("user")), ("content", SessionValue::from("x"))]),
        )]);
        let decoded = codec.decode(&codec.encode(&input).unwrap()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn foreign_type_value_leaves_mapping_intact() {
        let codec = MsgpackCodec::new();
        let input = tree(vec![(
            "record",
            SessionValue::mapping([
                ("type", SessionValue::from("__unknown__")),
                ("content", SessionValue::from("payload")),
            ]),
        )]);
        let decoded = codec.decode(&codec.encode(&input).unwrap()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn recognized_tag_with_non_string_content_stays_a_mapping() {
        let codec = MsgpackCodec::new();
        let input = tree(vec![(
            "record",
            SessionValue::mapping([
                ("type", SessionValue::from(MARKUP_TAG)),
                ("content", SessionValue::from(5i64)),
            ]),
        )]);
        let decoded = codec.decode(&codec.encode(&input).unwrap()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn discriminator_collision_is_a_known_limitation() {
        // A plain mapping whose `type` holds exactly a discriminator tag
        // next to a string `content` comes back unwrapped.
        let codec = MsgpackCodec::new();
        let input = tree(vec![(
            "record",
            SessionValue::mapping([
                ("type", SessionValue::from(MARKUP_TAG)),
                ("content", SessionValue::from("looks safe")),
            ]),
        )]);
        let decoded = codec.decode(&codec.encode(&input).unwrap()).unwrap();
        assert_eq!(
            decoded.get("record"),
            Some(&SessionValue::markup("looks safe"))
        );
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let codec = MsgpackCodec::new();
        let blob = rmp_serde::to_vec(&WireValue::Int(7)).unwrap();
        let err = codec.decode(&blob).unwrap_err();
        assert!(matches!(err, SessionFixError::Session(_)));
    }
}
