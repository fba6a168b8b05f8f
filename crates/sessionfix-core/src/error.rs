//! Error types shared by the codec and store layers.

use thiserror::Error;

/// A convenience `Result` alias using [`SessionFixError`].
pub type SessionFixResult<T> = Result<T, SessionFixError>;

/// Top-level error type for the sessionfix crates.
///
/// None of the layers perform local recovery: every error propagates
/// unchanged to the caller, so a corrupted session surfaces as a failed
/// load instead of silently producing a wrong tree.
#[derive(Debug, Error)]
pub enum SessionFixError {
    /// An error in configuration parsing or validation, such as an
    /// unrecognized fix name or a malformed host version string.
    #[error("Config error: {0}")]
    Config(String),

    /// A session-level fault surfaced by the store layer, such as a bad
    /// signature on a signed session token or a payload whose root is not
    /// a mapping.
    #[error("Session error: {0}")]
    Session(String),

    /// An error reported by a cache client implementation.
    #[error("Cache error: {0}")]
    Cache(String),

    /// A MessagePack serialization failure. Not expected for well-formed
    /// session trees and given no recoverable path.
    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// A structurally corrupt or truncated session blob that cannot be
    /// parsed into a value tree at all.
    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A timestamp envelope whose `content` is not valid timestamp text.
    #[error("Timestamp parse error: {0}")]
    TimestampParse(#[from] chrono::ParseError),
}
