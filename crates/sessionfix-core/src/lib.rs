//! Shared foundations for the sessionfix workspace.
//!
//! This crate provides the error type used across all sessionfix crates and
//! the registry of named fixes that deployments can disable through
//! configuration.
//!
//! # Main types
//!
//! - [`SessionFixError`] — Unified error enum for the codec and store layers.
//! - [`SessionFixResult`] — Convenience alias for `Result<T, SessionFixError>`.
//! - [`Fix`] — Closed enumeration of the named fixes this project ships.
//! - [`FixRegistry`] — Validated view of which fixes a deployment disabled.

pub mod error;
pub mod fixes;

pub use error::{SessionFixError, SessionFixResult};
pub use fixes::{Fix, FixRegistry};
