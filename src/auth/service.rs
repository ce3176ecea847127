//! Credential login and session authentication

use super::password::{CredentialHasher, hash_password, verify_password};
use super::session::{SessionClaims, SessionIssuer};
use crate::integrity::require;
use crate::model::{Account, AccountView};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// The only message a failed login ever reports
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    pub account: AccountView,
}

/// Why a login was refused; logged, never returned
#[derive(Debug, Clone, Copy)]
enum Refusal {
    UnknownEmail,
    Inactive,
    NoPassword,
    WrongPassword,
}

pub struct AuthService<S> {
    store: Arc<S>,
    hasher: Arc<dyn CredentialHasher>,
    sessions: SessionIssuer,
    /// Verified against when there is no stored digest, so every refusal
    /// costs one key derivation
    decoy_digest: String,
}

impl<S: RecordStore> AuthService<S> {
    pub async fn new(
        store: Arc<S>,
        hasher: Arc<dyn CredentialHasher>,
        sessions: SessionIssuer,
    ) -> Result<Self> {
        let decoy = Zeroizing::new(hex::encode(rand::random::<[u8; 16]>()));
        let decoy_digest = hash_password(hasher.clone(), decoy).await?;

        Ok(Self {
            store,
            hasher,
            sessions,
            decoy_digest,
        })
    }

    /// Exchange email and password for a session token
    pub async fn login(&self, request: LoginRequest) -> Result<ServiceResponse<LoginResult>> {
        let password = Zeroizing::new(request.password);

        let account = {
            let tx = self.store.begin().await?;
            tx.find_unique::<Account>("email", request.email.trim())
        };

        let refusal = match &account {
            None => Some(Refusal::UnknownEmail),
            Some(account) if !account.active => Some(Refusal::Inactive),
            Some(account) if account.password_digest.is_none() => Some(Refusal::NoPassword),
            Some(_) => None,
        };

        let digest = account
            .as_ref()
            .and_then(|account| account.password_digest.clone())
            .unwrap_or_else(|| self.decoy_digest.clone());
        let verified = verify_password(self.hasher.clone(), password, digest).await?;

        let refusal = match (refusal, verified) {
            (Some(refusal), _) => Some(refusal),
            (None, false) => Some(Refusal::WrongPassword),
            (None, true) => None,
        };

        match (refusal, account) {
            (None, Some(account)) => {
                let access_token = self.sessions.issue(&account)?;
                info!("🔓 Account {} logged in", account.id);
                Ok(ServiceResponse::ok(
                    "Login successful",
                    LoginResult {
                        access_token,
                        account: account.view(),
                    },
                ))
            }
            (refusal, _) => {
                warn!("🔒 Login refused: {:?}", refusal.unwrap_or(Refusal::UnknownEmail));
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    /// Resolve a session token to its still-active account
    pub async fn authenticate(&self, token: &str) -> Result<(SessionClaims, AccountView)> {
        let claims = self.sessions.verify(token)?;
        let account_id = claims.account_id()?;

        let tx = self.store.begin().await?;
        let account = require::<Account>(&tx, account_id)
            .map_err(|_| Error::unauthorized("Invalid session token"))?;
        if !account.active {
            return Err(Error::unauthorized("Invalid session token"));
        }

        Ok((claims, account.view()))
    }
}
