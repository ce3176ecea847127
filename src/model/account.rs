//! Accounts and their lifecycle states

use crate::store::{Record, UniqueKey};
use crate::types::{Id, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored account
///
/// Holds credential material, so it is never serialized directly; callers
/// receive [`AccountView`] or [`AccountSummary`].
#[derive(Clone, PartialEq)]
pub struct Account {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub password_digest: Option<String>,
    pub role: Role,
    pub active: bool,
    /// blake3 digest of the outstanding activation token
    pub activation_token_digest: Option<String>,
    pub activation_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle position of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    /// Created from a document number; no email yet
    PreRegistered,
    /// Email attached, waiting for the activation token
    PendingActivation,
    /// Password set; may log in
    Active,
}

impl Account {
    pub fn new(name: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            email: None,
            password_digest: None,
            role,
            active: false,
            activation_token_digest: None,
            activation_token_expiry: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> AccountState {
        if self.active {
            AccountState::Active
        } else if self.email.is_some() {
            AccountState::PendingActivation
        } else {
            AccountState::PreRegistered
        }
    }

    /// Drop any outstanding activation token
    pub fn clear_activation_token(&mut self) {
        self.activation_token_digest = None;
        self.activation_token_expiry = None;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.active,
            state: self.state(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("active", &self.active)
            .field("has_password", &self.password_digest.is_some())
            .field("has_activation_token", &self.activation_token_digest.is_some())
            .finish()
    }
}

impl Record for Account {
    const ENTITY: &'static str = "account";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        let mut keys = Vec::new();
        if let Some(email) = &self.email {
            keys.push(UniqueKey::new("email", email));
        }
        if let Some(digest) = &self.activation_token_digest {
            keys.push(UniqueKey::new("activation_token", digest));
        }
        keys
    }
}

/// Account as returned to callers; never carries credential material
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub state: AccountState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact account embedded in other views
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Administrative account creation
///
/// Supplying a password creates an active account directly.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}
