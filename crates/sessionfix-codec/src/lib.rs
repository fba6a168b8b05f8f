//! Lossless MessagePack serialization for session value trees.
//!
//! The host framework's session payloads can contain two value kinds that a
//! plain binary serializer cannot represent: safe-markup strings (flash
//! messages that must not be re-escaped when rendered) and timestamps.
//! [`MsgpackCodec`] carries both through MessagePack by wrapping them in a
//! small tagged envelope on encode and detecting that envelope on decode.
//!
//! ```
//! use sessionfix_codec::{MsgpackCodec, SessionValue, Timestamp};
//! use std::collections::BTreeMap;
//!
//! let mut tree = BTreeMap::new();
//! tree.insert("flash".to_string(), SessionValue::markup("<b>Saved!</b>"));
//! tree.insert(
//!     "created".to_string(),
//!     SessionValue::timestamp(Timestamp::parse("2024-01-15T10:30:00+00:00").unwrap()),
//! );
//!
//! let codec = MsgpackCodec::new();
//! let blob = codec.encode(&tree).unwrap();
//! assert_eq!(codec.decode(&blob).unwrap(), tree);
//! ```

pub mod codec;
pub mod value;
mod wire;

pub use codec::MsgpackCodec;
pub use value::{SessionTree, SessionValue, Timestamp};
