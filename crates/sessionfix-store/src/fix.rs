//! Conditional activation of the cache session fix.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sessionfix_codec::MsgpackCodec;
use sessionfix_core::{Fix, FixRegistry, SessionFixError};

use crate::client::CacheClient;
use crate::store::{CacheSessionStore, StoreOptions};

/// A `major.minor` host framework version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
}

impl HostVersion {
    /// Creates a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for HostVersion {
    type Err = SessionFixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SessionFixError::Config(format!("invalid host version `{s}`"));
        let (major, minor) = s.split_once('.').ok_or_else(bad)?;
        Ok(Self {
            major: major.parse().map_err(|_| bad())?,
            minor: minor.parse().map_err(|_| bad())?,
        })
    }
}

/// The oldest host version whose session layer this fix targets.
pub const MIN_HOST_VERSION: HostVersion = HostVersion::new(2, 11);

/// The host's configured session-store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackendKind {
    /// Sessions live in an external key-value cache.
    Cache,
    /// Sessions live in the client cookie.
    Cookie,
    /// Sessions live on the local filesystem.
    Filesystem,
}

/// Everything the activation decision needs, gathered from the host's
/// configuration. The fix layer never sees the host's full flag registry,
/// only the [`FixRegistry`] lookup.
#[derive(Debug, Clone)]
pub struct FixSettings {
    /// The host's session-store backend selector.
    pub backend: SessionBackendKind,
    /// The running host framework version.
    pub host_version: HostVersion,
    /// Options forwarded to the store.
    pub store: StoreOptions,
}

/// Builds the fixed session store when the deployment qualifies.
///
/// Returns `Some` only when sessions are cache-backed, the host is at or
/// above [`MIN_HOST_VERSION`], and [`Fix::CacheSession`] has not been
/// disabled. Otherwise the host's unmodified default store stays active
/// and the codec is never invoked.
pub fn apply_session_fix<C: CacheClient>(
    client: C,
    settings: FixSettings,
    registry: &FixRegistry,
) -> Option<CacheSessionStore<C>> {
    if settings.backend != SessionBackendKind::Cache {
        tracing::debug!(backend = ?settings.backend, "Session fix skipped: sessions are not cache-backed");
        return None;
    }
    if settings.host_version < MIN_HOST_VERSION {
        tracing::debug!(
            host = %settings.host_version,
            min = %MIN_HOST_VERSION,
            "Session fix skipped: host version below minimum"
        );
        return None;
    }
    if registry.is_disabled(Fix::CacheSession) {
        tracing::debug!(fix = %Fix::CacheSession, "Session fix skipped: disabled by configuration");
        return None;
    }

    let store = CacheSessionStore::new(client, settings.store, Arc::new(MsgpackCodec::new()));
    tracing::info!(format = %store.wire_format(), "Applied cache session fix");
    Some(store)
}
