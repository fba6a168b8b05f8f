//! The cache-backed session store.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sessionfix_codec::{MsgpackCodec, SessionTree};
use sessionfix_core::SessionFixResult;
use uuid::Uuid;

use crate::client::CacheClient;
use crate::signer::Signer;

/// The one seam the fix overrides: how a session tree becomes bytes and
/// back. Implementations must be purely functional per call.
pub trait SessionSerializer: Send + Sync {
    /// Serializes a session tree into the stored blob.
    fn encode(&self, tree: &SessionTree) -> SessionFixResult<Vec<u8>>;

    /// Deserializes a stored blob back into a session tree.
    fn decode(&self, blob: &[u8]) -> SessionFixResult<SessionTree>;

    /// The wire format this serializer produces.
    fn format(&self) -> WireFormat;
}

impl SessionSerializer for MsgpackCodec {
    fn encode(&self, tree: &SessionTree) -> SessionFixResult<Vec<u8>> {
        MsgpackCodec::encode(self, tree)
    }

    fn decode(&self, blob: &[u8]) -> SessionFixResult<SessionTree> {
        MsgpackCodec::decode(self, blob)
    }

    fn format(&self) -> WireFormat {
        WireFormat::Msgpack
    }
}

/// Declared wire format of the stored session blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// MessagePack, as produced by
    /// [`MsgpackCodec`](sessionfix_codec::MsgpackCodec).
    Msgpack,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Msgpack => f.write_str("msgpack"),
        }
    }
}

/// Construction-time options for [`CacheSessionStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Namespace prefix prepended to every cache key.
    pub key_prefix: String,
    /// Secret for session-id signing; `None` disables signing.
    pub secret: Option<String>,
    /// Default for the host's "permanent session" cookie policy. The
    /// server-side TTL applies either way.
    pub permanent: bool,
    /// Server-side lifetime of a stored session.
    pub lifetime: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key_prefix: "session:".to_string(),
            secret: None,
            permanent: false,
            lifetime: Duration::from_secs(31 * 24 * 60 * 60),
        }
    }
}

/// Session persistence over an injected [`CacheClient`], with the
/// serializer as an injected seam.
///
/// Constructed once per application start. The store owns no mutable
/// state, so one instance serves concurrent requests without locking;
/// the cache backend is the only shared resource.
pub struct CacheSessionStore<C: CacheClient> {
    client: C,
    serializer: Arc<dyn SessionSerializer>,
    key_prefix: String,
    signer: Option<Signer>,
    permanent_default: bool,
    lifetime: Duration,
    format: WireFormat,
}

impl<C: CacheClient> CacheSessionStore<C> {
    /// Creates a store from a cache client, options, and the serializer
    /// that every load/save will route through.
    pub fn new(client: C, options: StoreOptions, serializer: Arc<dyn SessionSerializer>) -> Self {
        let format = serializer.format();
        Self {
            client,
            serializer,
            key_prefix: options.key_prefix,
            signer: options.secret.map(Signer::new),
            permanent_default: options.permanent,
            lifetime: options.lifetime,
            format,
        }
    }

    fn resolve_sid(&self, token: &str) -> SessionFixResult<String> {
        match &self.signer {
            Some(signer) => signer.unsign(token),
            None => Ok(token.to_string()),
        }
    }

    fn cache_key(&self, sid: &str) -> String {
        format!("{}{}", self.key_prefix, sid)
    }

    /// Loads and decodes the session stored for `token`, or `None` when
    /// the cache has no entry (missing or expired).
    pub async fn load(&self, token: &str) -> SessionFixResult<Option<SessionTree>> {
        let sid = self.resolve_sid(token)?;
        let key = self.cache_key(&sid);
        let Some(blob) = self.client.get(&key).await? else {
            tracing::debug!(key = %key, "No stored session");
            return Ok(None);
        };
        let tree = self.serializer.decode(&blob)?;
        tracing::debug!(key = %key, bytes = blob.len(), "Loaded session");
        Ok(Some(tree))
    }

    /// Encodes and stores the session for `token` with the configured
    /// lifetime as TTL.
    pub async fn save(&self, token: &str, tree: &SessionTree) -> SessionFixResult<()> {
        let sid = self.resolve_sid(token)?;
        let key = self.cache_key(&sid);
        let blob = self.serializer.encode(tree)?;
        let bytes = blob.len();
        self.client.set(&key, blob, Some(self.lifetime)).await?;
        tracing::debug!(key = %key, bytes, ttl = ?self.lifetime, "Saved session");
        Ok(())
    }

    /// Removes the session stored for `token`.
    pub async fn delete(&self, token: &str) -> SessionFixResult<()> {
        let sid = self.resolve_sid(token)?;
        let key = self.cache_key(&sid);
        self.client.delete(&key).await?;
        tracing::debug!(key = %key, "Deleted session");
        Ok(())
    }

    /// Issues a fresh session id, signed into a token when signing is
    /// enabled.
    pub fn issue_session_id(&self) -> String {
        let sid = Uuid::new_v4().to_string();
        match &self.signer {
            Some(signer) => signer.sign(&sid),
            None => sid,
        }
    }

    /// The "permanent session" default surfaced to the host's cookie
    /// layer.
    pub fn permanent_default(&self) -> bool {
        self.permanent_default
    }

    /// The configured server-side session lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The wire format of the stored blobs.
    pub fn wire_format(&self) -> WireFormat {
        self.format
    }
}
