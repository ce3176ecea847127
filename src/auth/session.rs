//! Session tokens
//!
//! HS256-signed JWTs carrying the subject id, email and role.

use crate::config::AuthConfig;
use crate::model::Account;
use crate::types::{Id, Role};
use crate::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Upper bound on configured session lifetimes (one year)
const MAX_EXPIRY_SECONDS: i64 = 365 * 86_400;

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl SessionClaims {
    pub fn account_id(&self) -> Result<Id> {
        self.sub
            .parse()
            .map_err(|_| Error::unauthorized("Invalid session token"))
    }
}

/// Signs and verifies session tokens
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
}

impl SessionIssuer {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let secret = config.session_secret_bytes()?;
        if secret.len() < 32 {
            return Err(Error::internal("session secret must be at least 32 bytes"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            expiry_seconds: i64::try_from(config.session_expiry_seconds)
                .unwrap_or(MAX_EXPIRY_SECONDS)
                .min(MAX_EXPIRY_SECONDS),
        })
    }

    /// Mint a token for an account with a bound email
    pub fn issue(&self, account: &Account) -> Result<String> {
        let email = account
            .email
            .clone()
            .ok_or_else(|| Error::internal("cannot issue a session without an email"))?;

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account.id.to_string(),
            email,
            role: account.role,
            iat: now,
            exp: now + self.expiry_seconds,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("session signing failed: {e}")))?;
        debug!("🎫 Session issued for account {} (jti {})", account.id, claims.jti);
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Session token rejected: {}", e);
                Error::unauthorized("Invalid session token")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let mut account = Account::new("Juan Pérez".to_string(), Role::Voter);
        account.id = 7;
        account.email = Some("juan@x.pe".to_string());
        account.active = true;
        account
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new(&AuthConfig::for_testing()).unwrap();
        let token = issuer.issue(&account()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.account_id().unwrap(), 7);
        assert_eq!(claims.email, "juan@x.pe");
        assert_eq!(claims.role, Role::Voter);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = SessionIssuer::new(&AuthConfig::for_testing()).unwrap();
        let other = SessionIssuer::new(&AuthConfig::for_testing()).unwrap();

        let token = other.issue(&account()).unwrap();
        assert!(issuer.verify(&token).unwrap_err().is_unauthorized());
        assert!(issuer.verify("not-a-jwt").unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_expiry_is_capped() {
        let mut config = AuthConfig::for_testing();
        config.session_expiry_seconds = u64::MAX;
        let issuer = SessionIssuer::new(&config).unwrap();

        let token = issuer.issue(&account()).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_EXPIRY_SECONDS);

        config.session_expiry_seconds = i64::MAX as u64 - 10;
        let issuer = SessionIssuer::new(&config).unwrap();
        assert!(issuer.issue(&account()).is_ok());
    }

    #[test]
    fn test_requires_email() {
        let issuer = SessionIssuer::new(&AuthConfig::for_testing()).unwrap();
        let mut account = account();
        account.email = None;
        assert!(issuer.issue(&account).is_err());
    }
}
