//! HMAC-SHA256 signing of session ids.
//!
//! When the store is configured with a secret, the session id handed to
//! the client is a `sid.signature` token; the store verifies the
//! signature before touching the cache.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sessionfix_core::{SessionFixError, SessionFixResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies session-id tokens.
pub struct Signer {
    key: Vec<u8>,
}

impl Signer {
    /// Creates a signer from the configured secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { key: secret.into() }
    }

    #[allow(clippy::expect_used)]
    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length")
    }

    /// Produces the `sid.signature` token for a session id.
    pub fn sign(&self, sid: &str) -> String {
        let mut mac = self.mac();
        mac.update(sid.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{sid}.{signature}")
    }

    /// Verifies a token and returns the bare session id.
    pub fn unsign(&self, token: &str) -> SessionFixResult<String> {
        let (sid, signature) = token.rsplit_once('.').ok_or_else(|| {
            SessionFixError::Session("session token is missing a signature".to_string())
        })?;
        let raw = URL_SAFE_NO_PAD.decode(signature).map_err(|_| {
            SessionFixError::Session("session token signature is not valid base64".to_string())
        })?;

        let mut mac = self.mac();
        mac.update(sid.as_bytes());
        mac.verify_slice(&raw).map_err(|_| {
            SessionFixError::Session("session token signature mismatch".to_string())
        })?;
        Ok(sid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_unsign_round_trip() {
        let signer = Signer::new("secret".to_string());
        let token = signer.sign("abc123");
        assert!(token.starts_with("abc123."));
        assert_eq!(signer.unsign(&token).unwrap(), "abc123");
    }

    #[test]
    fn tampered_sid_is_rejected() {
        let signer = Signer::new("secret".to_string());
        let token = signer.sign("abc123");
        let forged = token.replacen("abc123", "abc124", 1);
        assert!(matches!(
            signer.unsign(&forged).unwrap_err(),
            SessionFixError::Session(_)
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = Signer::new("secret".to_string()).sign("abc123");
        let other = Signer::new("different".to_string());
        assert!(other.unsign(&token).is_err());
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let signer = Signer::new("secret".to_string());
        assert!(signer.unsign("no-separator").is_err());
        assert!(signer.unsign("sid.%%%not-base64%%%").is_err());
    }
}
