//! Password digests
//!
//! Digests are self-describing strings:
//! `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`. Verification reads the
//! iteration count from the digest, so raising the configured rounds never
//! invalidates stored passwords.

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// One-way password hashing
///
/// Implementations are CPU-bound; async callers go through [`hash_password`]
/// and [`verify_password`], which move the work off the runtime threads.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    /// `false` for a wrong password and for an unreadable digest alike
    fn verify(&self, password: &str, digest: &str) -> bool;
}

/// PBKDF2-HMAC-SHA256 with a random per-password salt
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    iterations: u32,
}

impl Pbkdf2Hasher {
    pub fn new(iterations: u32) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::internal("password hash iterations must be non-zero"));
        }
        Ok(Self { iterations })
    }

    fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LEN]> {
        let mut out = Zeroizing::new([0u8; HASH_LEN]);
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out[..]);
        out
    }
}

impl CredentialHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let derived = Self::derive(password, &salt, self.iterations);
        Ok(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(&derived[..])
        ))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        let mut parts = digest.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        if iterations == 0 {
            return false;
        }
        let (Ok(salt), Ok(expected)) = (
            STANDARD_NO_PAD.decode(salt),
            STANDARD_NO_PAD.decode(expected),
        ) else {
            return false;
        };
        if expected.len() != HASH_LEN {
            return false;
        }

        let derived = Self::derive(password, &salt, iterations);
        derived[..].ct_eq(&expected[..]).into()
    }
}

/// Hash on the blocking pool
pub async fn hash_password(
    hasher: Arc<dyn CredentialHasher>,
    password: Zeroizing<String>,
) -> Result<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| Error::internal(format!("password hashing task failed: {e}")))?
}

/// Verify on the blocking pool
pub async fn verify_password(
    hasher: Arc<dyn CredentialHasher>,
    password: Zeroizing<String>,
    digest: String,
) -> Result<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
        .await
        .map_err(|e| Error::internal(format!("password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Pbkdf2Hasher::new(1_000).unwrap();
        let digest = hasher.hash("Secret123").unwrap();

        assert!(digest.starts_with("pbkdf2-sha256$1000$"));
        assert!(hasher.verify("Secret123", &digest));
        assert!(!hasher.verify("Secret124", &digest));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = Pbkdf2Hasher::new(1_000).unwrap();
        let first = hasher.hash("Secret123").unwrap();
        let second = hasher.hash("Secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rounds_come_from_digest() {
        let old = Pbkdf2Hasher::new(500).unwrap().hash("Secret123").unwrap();
        let current = Pbkdf2Hasher::new(2_000).unwrap();
        assert!(current.verify("Secret123", &old));
    }

    #[test]
    fn test_malformed_digests_never_verify() {
        let hasher = Pbkdf2Hasher::new(1_000).unwrap();
        for digest in [
            "",
            "plaintext",
            "bcrypt$10$abc$def",
            "pbkdf2-sha256$x$abc$def",
            "pbkdf2-sha256$0$abc$def",
            "pbkdf2-sha256$1000$!!$def",
            "pbkdf2-sha256$1000$abc$def$extra",
        ] {
            assert!(!hasher.verify("Secret123", digest), "{digest}");
        }
        assert!(Pbkdf2Hasher::new(0).is_err());
    }

    #[tokio::test]
    async fn test_blocking_pool_helpers() {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Pbkdf2Hasher::new(1_000).unwrap());
        let digest = hash_password(hasher.clone(), Zeroizing::new("Secret123".to_string()))
            .await
            .unwrap();

        let ok = verify_password(hasher, Zeroizing::new("Secret123".to_string()), digest)
            .await
            .unwrap();
        assert!(ok);
    }
}
