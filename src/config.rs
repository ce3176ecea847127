//! Configuration management for the electoral service layer
//!
//! Loads secrets and tunables from environment variables with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default activation token lifetime (24 hours)
const DEFAULT_ACTIVATION_TTL_SECONDS: u64 = 86_400;

/// Default session token lifetime (24 hours)
const DEFAULT_SESSION_EXPIRY_SECONDS: u64 = 86_400;

/// Default PBKDF2 rounds for password digests
const DEFAULT_HASH_ITERATIONS: u32 = 600_000;

/// Credential and token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC key for signing session tokens (base64 encoded, minimum 32 bytes)
    pub session_secret: String,

    /// Session token lifetime in seconds
    pub session_expiry_seconds: u64,

    /// Activation token lifetime in seconds
    pub activation_token_ttl_seconds: u64,

    /// PBKDF2-HMAC-SHA256 rounds used for password digests
    pub password_hash_iterations: u32,

    /// Minimum accepted password length
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Load auth configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_secret = std::env::var("SESSION_SECRET")
            .map_err(|_| Error::internal("SESSION_SECRET environment variable required"))?;

        Self::validate_secret(&session_secret, "SESSION_SECRET")?;

        let session_expiry_seconds = std::env::var("SESSION_EXPIRY_SECONDS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_SECONDS.to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid SESSION_EXPIRY_SECONDS"))?;

        let activation_token_ttl_seconds = std::env::var("ACTIVATION_TOKEN_TTL_SECONDS")
            .unwrap_or_else(|_| DEFAULT_ACTIVATION_TTL_SECONDS.to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid ACTIVATION_TOKEN_TTL_SECONDS"))?;

        let password_hash_iterations: u32 = std::env::var("PASSWORD_HASH_ITERATIONS")
            .unwrap_or_else(|_| DEFAULT_HASH_ITERATIONS.to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid PASSWORD_HASH_ITERATIONS"))?;

        if password_hash_iterations == 0 {
            return Err(Error::internal("PASSWORD_HASH_ITERATIONS must be non-zero"));
        }

        let password_min_length = std::env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "6".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid PASSWORD_MIN_LENGTH"))?;

        Ok(Self {
            session_secret,
            session_expiry_seconds,
            activation_token_ttl_seconds,
            password_hash_iterations,
            password_min_length,
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        use base64::Engine;
        let session_secret =
            base64::engine::general_purpose::STANDARD.encode(rand::random::<[u8; 32]>());

        Self {
            session_secret,
            session_expiry_seconds: 3600,
            activation_token_ttl_seconds: DEFAULT_ACTIVATION_TTL_SECONDS,
            password_hash_iterations: 1_000, // Cheap for testing
            password_min_length: 6,
        }
    }

    /// Validate a base64-encoded secret
    fn validate_secret(secret: &str, name: &str) -> Result<()> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(secret)
            .map_err(|_| Error::internal(format!("{name} must be valid base64")))?;

        if decoded.len() < 32 {
            return Err(Error::internal(format!(
                "{name} must be at least 32 bytes when decoded"
            )));
        }

        Ok(())
    }

    /// Get session secret as bytes
    pub fn session_secret_bytes(&self) -> Result<Vec<u8>> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&self.session_secret)
            .map_err(|_| Error::internal("Invalid session secret"))
    }
}

/// Outbound notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Base URL of the frontend that hosts the activation page
    pub frontend_url: String,
    pub from_name: String,
    pub from_email: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            from_name: std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "InfoVoto".to_string()),
            from_email: std::env::var("MAIL_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@infovoto.pe".to_string()),
        }
    }

    /// Build the activation link embedding a raw token
    pub fn activation_link(&self, token: &str) -> String {
        format!(
            "{}/activate?token={}",
            self.frontend_url.trim_end_matches('/'),
            token
        )
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3001".to_string(),
            from_name: "InfoVoto".to_string(),
            from_email: "noreply@infovoto.pe".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let auth = AuthConfig::from_env()?;
        let mail = MailConfig::from_env();

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
        };

        Ok(Self {
            auth,
            mail,
            logging,
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Self {
            auth: AuthConfig::for_testing(),
            mail: MailConfig::default(),
            logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_for_testing() {
        let config = AuthConfig::for_testing();

        assert!(config.session_secret_bytes().unwrap().len() >= 32);
        assert_eq!(config.activation_token_ttl_seconds, 86_400);
        assert!(config.session_expiry_seconds > 0);
        assert!(config.password_hash_iterations > 0);
    }

    #[test]
    fn test_secret_validation() {
        use base64::Engine;
        let valid = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);
        assert!(AuthConfig::validate_secret(&valid, "TEST").is_ok());

        let short = base64::engine::general_purpose::STANDARD.encode([0u8; 16]);
        assert!(AuthConfig::validate_secret(&short, "TEST").is_err());

        assert!(AuthConfig::validate_secret("not base64!", "TEST").is_err());
    }

    #[test]
    fn test_activation_link() {
        let mail = MailConfig {
            frontend_url: "https://infovoto.pe/".to_string(),
            ..MailConfig::default()
        };

        assert_eq!(
            mail.activation_link("abc123"),
            "https://infovoto.pe/activate?token=abc123"
        );
    }
}
