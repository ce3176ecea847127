//! Account administration and the activation lifecycle
//!
//! ```text
//! pre-registered ──register_email──▶ pending activation ──activate_account──▶ active
//!                                      │        ▲
//!                                      └resend──┘
//! ```
//!
//! Accounts created directly with a password skip straight to active.

use crate::auth::{ActivationTokenIssuer, CredentialHasher, hash_password};
use crate::config::MailConfig;
use crate::integrity::{ensure_unique, require};
use crate::model::{Account, AccountPatch, AccountView, NewAccount, VoterProfile, require_email, require_text};
use crate::notify::{ActivationNotice, Notifier, dispatch_activation};
use crate::response::ServiceResponse;
use crate::store::{Record, RecordStore, Transaction};
use crate::types::{Id, Role};
use crate::{Error, Result, bad_request, conflict};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

const EMAIL_TAKEN: &str = "Email is already registered";

/// Email bound by a registration or targeted by a resend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRegistration {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmailRequest {
    pub document_number: String,
    pub email: String,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateAccountRequest {
    pub token: String,
    pub password: String,
}

pub struct AccountService<S> {
    store: Arc<S>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: ActivationTokenIssuer,
    notifier: Arc<dyn Notifier>,
    mail: MailConfig,
    password_min_length: usize,
}

impl<S: RecordStore> AccountService<S> {
    pub fn new(
        store: Arc<S>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: ActivationTokenIssuer,
        notifier: Arc<dyn Notifier>,
        mail: MailConfig,
        password_min_length: usize,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            notifier,
            mail,
            password_min_length,
        }
    }

    fn check_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.password_min_length {
            return Err(Error::validation(
                "password",
                format!("must be at least {} characters", self.password_min_length),
            ));
        }
        Ok(())
    }

    async fn digest_password(&self, password: String) -> Result<String> {
        self.check_password(&password)?;
        hash_password(self.hasher.clone(), Zeroizing::new(password)).await
    }

    fn send_activation(&self, account: &Account, email: &str, token: &str) {
        dispatch_activation(
            self.notifier.clone(),
            ActivationNotice {
                recipient: email.to_string(),
                name: account.name.clone(),
                link: self.mail.activation_link(token),
            },
        );
    }

    /// Create an account directly; a supplied password makes it active and
    /// then an email is mandatory
    pub async fn create(&self, input: NewAccount) -> Result<ServiceResponse<AccountView>> {
        require_text("name", &input.name)?;
        let email = input.email.map(|email| email.trim().to_string());
        match &email {
            Some(email) => require_email(email)?,
            None if input.password.is_some() => {
                return Err(Error::validation(
                    "email",
                    "is required when a password is supplied",
                ));
            }
            None => {}
        }
        let digest = match input.password {
            Some(password) => Some(self.digest_password(password).await?),
            None => None,
        };

        let mut tx = self.store.begin().await?;
        if let Some(email) = &email {
            ensure_unique::<Account>(&tx, "email", email, None, EMAIL_TAKEN)?;
        }

        let mut account = Account::new(input.name.trim().to_string(), input.role.unwrap_or_default());
        account.email = email;
        account.active = digest.is_some();
        account.password_digest = digest;

        let account = tx.insert(account)?;
        tx.commit()?;

        info!(
            "👤 Account {} created ({}, {:?})",
            account.id,
            account.role,
            account.state()
        );
        Ok(ServiceResponse::created(
            "Account created successfully",
            account.view(),
        ))
    }

    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<AccountView>>> {
        let tx = self.store.begin().await?;
        let accounts = tx.list::<Account>().iter().map(Account::view).collect();
        Ok(ServiceResponse::ok("Accounts retrieved successfully", accounts))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<AccountView>> {
        let tx = self.store.begin().await?;
        let account = require::<Account>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Account retrieved successfully",
            account.view(),
        ))
    }

    pub async fn update(&self, id: Id, patch: AccountPatch) -> Result<ServiceResponse<AccountView>> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        let email = patch.email.map(|email| email.trim().to_string());
        if let Some(email) = &email {
            require_email(email)?;
        }
        let digest = match patch.password {
            Some(password) => Some(self.digest_password(password).await?),
            None => None,
        };

        let mut tx = self.store.begin().await?;
        let mut account = require::<Account>(&tx, id)?;

        if let Some(name) = patch.name {
            account.name = name.trim().to_string();
        }
        if let Some(email) = email {
            ensure_unique::<Account>(&tx, "email", &email, Some(id), EMAIL_TAKEN)?;
            account.email = Some(email);
        }
        if let Some(role) = patch.role {
            account.role = role;
        }
        if digest.is_some() {
            account.password_digest = digest;
        }
        account.touch();

        let account = tx.update(account)?;
        tx.commit()?;

        debug!("👤 Account {} updated", account.id);
        Ok(ServiceResponse::ok(
            "Account updated successfully",
            account.view(),
        ))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<AccountView>> {
        let mut tx = self.store.begin().await?;
        let account = tx.delete::<Account>(id)?;
        tx.commit()?;

        info!("🗑️ Account {} removed", account.id);
        Ok(ServiceResponse::ok(
            "Account removed successfully",
            account.view(),
        ))
    }

    /// Bind an email to a pre-registered voter and send an activation link
    pub async fn register_email(
        &self,
        request: RegisterEmailRequest,
    ) -> Result<ServiceResponse<EmailRegistration>> {
        let email = request.email.trim().to_string();
        require_email(&email)?;

        let mut tx = self.store.begin().await?;
        let voter = tx
            .find_unique::<VoterProfile>("document_number", request.document_number.trim())
            .ok_or_else(|| Error::not_found(VoterProfile::ENTITY))?;
        let mut account = require::<Account>(&tx, voter.account_id)?;

        if account.email.is_some() {
            return Err(conflict!("This voter already has an email registered"));
        }
        if account.active {
            return Err(bad_request!("Account is already active"));
        }
        ensure_unique::<Account>(&tx, "email", &email, Some(account.id), EMAIL_TAKEN)?;

        let issued = self.tokens.issue();
        account.email = Some(email.clone());
        account.activation_token_digest = Some(issued.digest);
        account.activation_token_expiry = Some(issued.expires_at);
        account.touch();

        let account = tx.update(account)?;
        tx.commit()?;

        info!(
            "📨 Email bound to account {}; activation token valid until {}",
            account.id, issued.expires_at
        );
        self.send_activation(&account, &email, &issued.token);

        Ok(ServiceResponse::ok(
            "Activation instructions sent; check your inbox",
            EmailRegistration { email },
        ))
    }

    /// Resolve a raw token to the account it may activate
    fn redeemable(tx: &impl Transaction, token_digest: &str) -> Result<Account> {
        let account = tx
            .find_unique::<Account>("activation_token", token_digest)
            .ok_or_else(|| bad_request!("Invalid activation token"))?;

        if account
            .activation_token_expiry
            .is_some_and(|expiry| expiry < Utc::now())
        {
            return Err(bad_request!("Activation token has expired"));
        }
        if account.active {
            return Err(bad_request!("Account is already active"));
        }
        Ok(account)
    }

    /// Redeem an activation token, setting the account's password
    pub async fn activate_account(
        &self,
        request: ActivateAccountRequest,
    ) -> Result<ServiceResponse<AccountView>> {
        let token_digest = ActivationTokenIssuer::digest(request.token.trim());
        let password = Zeroizing::new(request.password);

        {
            let tx = self.store.begin().await?;
            Self::redeemable(&tx, &token_digest)?;
        }

        self.check_password(&password)?;
        let digest = hash_password(self.hasher.clone(), password).await?;

        // Checked again under the write that consumes the token
        let mut tx = self.store.begin().await?;
        let mut account = Self::redeemable(&tx, &token_digest)?;
        account.password_digest = Some(digest);
        account.active = true;
        account.clear_activation_token();
        account.touch();

        let account = tx.update(account)?;
        tx.commit()?;

        info!("✅ Account {} activated", account.id);
        Ok(ServiceResponse::ok(
            "Account activated successfully",
            account.view(),
        ))
    }

    /// Replace the outstanding activation token and send a new link
    pub async fn resend_activation_token(
        &self,
        email: &str,
    ) -> Result<ServiceResponse<EmailRegistration>> {
        let email = email.trim().to_string();

        let mut tx = self.store.begin().await?;
        let mut account = tx
            .find_unique::<Account>("email", &email)
            .ok_or_else(|| Error::not_found(Account::ENTITY))?;
        if account.active {
            return Err(bad_request!("Account is already active"));
        }

        let issued = self.tokens.issue();
        account.activation_token_digest = Some(issued.digest);
        account.activation_token_expiry = Some(issued.expires_at);
        account.touch();

        let account = tx.update(account)?;
        tx.commit()?;

        info!("🔁 Activation token reissued for account {}", account.id);
        self.send_activation(&account, &email, &issued.token);

        Ok(ServiceResponse::ok(
            "New activation instructions sent; check your inbox",
            EmailRegistration { email },
        ))
    }

    /// Accounts holding a given role
    pub async fn find_by_role(&self, role: Role) -> Result<ServiceResponse<Vec<AccountView>>> {
        let tx = self.store.begin().await?;
        let accounts = tx
            .find_where::<Account>(|account| account.role == role)
            .iter()
            .map(Account::view)
            .collect();
        Ok(ServiceResponse::ok("Accounts retrieved successfully", accounts))
    }
}
