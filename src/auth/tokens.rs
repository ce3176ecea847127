//! Activation tokens
//!
//! A token is 32 random bytes, hex encoded, handed to the account holder
//! through the activation link. Only its blake3 digest is persisted, so a
//! leaked account table cannot be replayed against the activation flow.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

const TOKEN_BYTES: usize = 32;

/// Upper bound on configured lifetimes (one year)
const MAX_TTL_SECONDS: i64 = 365 * 86_400;

/// Freshly issued activation token
#[derive(Clone)]
pub struct ActivationToken {
    /// Raw token; only ever leaves the process inside the activation link
    pub token: String,
    /// Digest stored on the account
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for ActivationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationToken")
            .field("digest", &self.digest)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues activation tokens with a fixed lifetime
#[derive(Debug, Clone)]
pub struct ActivationTokenIssuer {
    ttl: Duration,
}

impl ActivationTokenIssuer {
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl_seconds = i64::try_from(ttl_seconds)
            .unwrap_or(MAX_TTL_SECONDS)
            .min(MAX_TTL_SECONDS);
        Self {
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self) -> ActivationToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        ActivationToken {
            digest: Self::digest(&token),
            token,
            expires_at: Utc::now() + self.ttl,
        }
    }

    /// Digest under which a raw token is stored and looked up
    pub fn digest(token: &str) -> String {
        blake3::hash(token.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue() {
        let issuer = ActivationTokenIssuer::new(86_400);
        let issued = issuer.issue();

        assert_eq!(issued.token.len(), TOKEN_BYTES * 2);
        assert_eq!(issued.digest, ActivationTokenIssuer::digest(&issued.token));
        assert_ne!(issued.digest, issued.token);

        let remaining = issued.expires_at - Utc::now();
        assert!(remaining > Duration::hours(23));
        assert!(remaining <= Duration::hours(24));
    }

    #[test]
    fn test_tokens_are_unique() {
        let issuer = ActivationTokenIssuer::new(60);
        assert_ne!(issuer.issue().token, issuer.issue().token);
    }

    #[test]
    fn test_debug_omits_raw_token() {
        let issued = ActivationTokenIssuer::new(60).issue();
        assert!(!format!("{issued:?}").contains(&issued.token));
    }
}
