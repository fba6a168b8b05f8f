//! Cache-backed session persistence with one overridable seam.
//!
//! [`CacheSessionStore`] holds the session lifecycle — key construction,
//! optional session-id signing, TTL-based expiry, delete — and delegates
//! the byte-level work to two injected collaborators: a [`CacheClient`]
//! (the host's cache handle) and a [`SessionSerializer`] (the value
//! codec). Swapping the serializer is the entire behavioral delta this
//! project exists for; [`apply_session_fix`] performs that swap when the
//! deployment qualifies.
//!
//! ```no_run
//! use sessionfix_core::FixRegistry;
//! use sessionfix_store::{
//!     apply_session_fix, FixSettings, HostVersion, InMemoryCacheClient,
//!     SessionBackendKind, StoreOptions,
//! };
//!
//! let registry = FixRegistry::default();
//! let settings = FixSettings {
//!     backend: SessionBackendKind::Cache,
//!     host_version: HostVersion::new(2, 11),
//!     store: StoreOptions::default(),
//! };
//! if let Some(store) = apply_session_fix(InMemoryCacheClient::new(), settings, &registry) {
//!     // Install `store` as the application's session interface.
//!     let _ = store;
//! }
//! ```

pub mod client;
pub mod fix;
pub mod signer;
pub mod store;

pub use client::{CacheClient, InMemoryCacheClient};
pub use fix::{apply_session_fix, FixSettings, HostVersion, SessionBackendKind, MIN_HOST_VERSION};
pub use signer::Signer;
pub use store::{CacheSessionStore, SessionSerializer, StoreOptions, WireFormat};
