//! Credentials, activation tokens and sessions

pub mod password;
pub mod service;
pub mod session;
pub mod tokens;

pub use password::{CredentialHasher, Pbkdf2Hasher, hash_password, verify_password};
pub use service::{AuthService, INVALID_CREDENTIALS, LoginRequest, LoginResult};
pub use session::{SessionClaims, SessionIssuer};
pub use tokens::{ActivationToken, ActivationTokenIssuer};
