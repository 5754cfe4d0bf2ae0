//! Sign-in reconciliation.
//!
//! # Responsibility
//! - Map a successful third-party authentication onto a stored account.
//! - Decide whether the session may proceed.
//!
//! # Invariants
//! - At most one account exists per email, including under concurrent first
//!   sign-ins (the insert is conditional on email, not preceded by a read).
//! - Existing accounts are never modified.
//! - Any storage failure denies the sign-in; nothing is retried.
//! - Log events carry provider metadata only, never the email address.

use crate::model::user::{NewUserAccount, UserAccount};
use crate::repo::user_repo::AccountRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use serde::Deserialize;
use std::cell::Cell;
use thiserror::Error;

/// Profile fields reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Provider-side identity of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccount {
    pub provider: String,
    pub provider_account_id: String,
}

/// Payload delivered by the auth collaborator after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInCallback {
    pub user: CandidateUser,
    pub account: ProviderAccount,
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No account existed for the email; this one was stored.
    Created(UserAccount),
    /// An account already existed and was left untouched.
    Existing(UserAccount),
}

impl ReconcileOutcome {
    pub fn account(&self) -> &UserAccount {
        match self {
            Self::Created(account) | Self::Existing(account) => account,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("identity provider did not supply an email address")]
    MissingEmail,
    #[error("account store unavailable: {0}")]
    StorageUnavailable(#[from] RepoError),
    #[error("account for email disappeared after reconciliation")]
    AccountVanished,
}

/// Reconciles provider identities with stored accounts.
pub struct SignInReconciler<A: AccountRepository> {
    accounts: A,
    index_ready: Cell<bool>,
}

impl<A: AccountRepository> SignInReconciler<A> {
    pub fn new(accounts: A) -> Self {
        Self {
            accounts,
            index_ready: Cell::new(false),
        }
    }

    /// Ensures an account exists for the callback's email.
    ///
    /// # Errors
    /// - `MissingEmail` when the provider sent no usable email.
    /// - `StorageUnavailable` on any repository failure.
    pub fn reconcile(&self, callback: &SignInCallback) -> Result<ReconcileOutcome, SignInError> {
        let email = callback
            .user
            .email
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SignInError::MissingEmail)?;

        self.ensure_index()?;

        let candidate = NewUserAccount::new(
            &callback.account.provider,
            &callback.account.provider_account_id,
            callback.user.name.clone(),
            email,
            callback.user.image.clone(),
        );
        let inserted = self.accounts.insert_if_absent(&candidate)?;
        let stored = self
            .accounts
            .find_by_email(email)?
            .ok_or(SignInError::AccountVanished)?;

        if inserted {
            info!(
                "event=sign_in module=auth status=ok outcome=created provider={} account_id={}",
                callback.account.provider, stored.id
            );
            Ok(ReconcileOutcome::Created(stored))
        } else {
            info!(
                "event=sign_in module=auth status=ok outcome=existing provider={} account_id={}",
                callback.account.provider, stored.id
            );
            Ok(ReconcileOutcome::Existing(stored))
        }
    }

    /// Fail-closed decision for the auth collaborator.
    ///
    /// Returns `true` to let the session proceed.
    pub fn sign_in(&self, callback: &SignInCallback) -> bool {
        match self.reconcile(callback) {
            Ok(_) => true,
            Err(SignInError::MissingEmail) => {
                warn!(
                    "event=sign_in module=auth status=denied provider={} error_code=missing_email",
                    callback.account.provider
                );
                false
            }
            Err(err) => {
                error!(
                    "event=sign_in module=auth status=denied provider={} error_code=storage_unavailable error={}",
                    callback.account.provider, err
                );
                false
            }
        }
    }

    fn ensure_index(&self) -> Result<(), SignInError> {
        if !self.index_ready.get() {
            self.accounts.ensure_poem_owner_index()?;
            self.index_ready.set(true);
        }
        Ok(())
    }
}
