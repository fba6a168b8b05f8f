//! Registry of named fixes and their disable switches.
//!
//! Deployments disable individual fixes by listing their names in
//! configuration. The registry validates that list up front, so the
//! activation checks downstream can rely on every configured name being a
//! real fix.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{SessionFixError, SessionFixResult};

/// A named fix shipped by this project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fix {
    /// Lossless session serialization for cache-backed session stores.
    CacheSession,
}

impl Fix {
    /// Every fix this project knows about.
    pub const ALL: [Fix; 1] = [Fix::CacheSession];

    /// The configuration name of this fix.
    pub fn name(&self) -> &'static str {
        match self {
            Fix::CacheSession => "cache_session",
        }
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fix {
    type Err = SessionFixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fix::ALL
            .iter()
            .copied()
            .find(|fix| fix.name() == s)
            .ok_or_else(|| {
                let available: Vec<&str> = Fix::ALL.iter().map(Fix::name).collect();
                SessionFixError::Config(format!(
                    "unknown fix `{s}`; available fixes: {}",
                    available.join(", ")
                ))
            })
    }
}

/// Which fixes a deployment has switched off.
///
/// Built once at startup from the configured list of disabled fix names.
/// Construction fails on any name that does not match a [`Fix`].
#[derive(Debug, Default, Clone)]
pub struct FixRegistry {
    disabled: HashSet<Fix>,
}

impl FixRegistry {
    /// Builds a registry from the configured disabled-fix names.
    pub fn from_disabled<I, S>(names: I) -> SessionFixResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut disabled = HashSet::new();
        for name in names {
            disabled.insert(name.as_ref().parse::<Fix>()?);
        }
        Ok(Self { disabled })
    }

    /// Whether the given fix has been disabled by configuration.
    pub fn is_disabled(&self, fix: Fix) -> bool {
        self.disabled.contains(&fix)
    }

    /// Logs which fixes are enabled and which are disabled.
    ///
    /// Intended to run once at startup.
    pub fn notify(&self) {
        let mut enabled = Vec::new();
        let mut disabled = Vec::new();
        for fix in Fix::ALL {
            if self.is_disabled(fix) {
                disabled.push(fix.name());
            } else {
                enabled.push(fix.name());
            }
        }
        tracing::info!(enabled = ?enabled, disabled = ?disabled, "Named fixes loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_name_round_trips() {
        for fix in Fix::ALL {
            assert_eq!(fix.name().parse::<Fix>().unwrap(), fix);
        }
    }

    #[test]
    fn unknown_fix_is_config_error() {
        let err = "no_such_fix".parse::<Fix>().unwrap_err();
        assert!(matches!(err, SessionFixError::Config(_)));
        assert!(err.to_string().contains("cache_session"));
    }

    #[test]
    fn registry_validates_disabled_names() {
        let err = FixRegistry::from_disabled(["cache_session", "bogus"]).unwrap_err();
        assert!(matches!(err, SessionFixError::Config(_)));
    }

    #[test]
    fn registry_membership() {
        let registry = FixRegistry::from_disabled(["cache_session"]).unwrap();
        assert!(registry.is_disabled(Fix::CacheSession));

        let registry = FixRegistry::default();
        assert!(!registry.is_disabled(Fix::CacheSession));
    }
}
