//! User account model.
//!
//! # Responsibility
//! - Define the stored account record created on first sign-in.
//! - Derive the account identifier from provider identity.
//!
//! # Invariants
//! - `id` is `"<provider>-<providerAccountId>"` and never reassigned.
//! - `email` is the reconciliation key; at most one account exists per email.

use serde::{Deserialize, Serialize};

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    /// Unix epoch milliseconds assigned by storage on insert.
    pub created_at: i64,
}

/// Account record to insert when no account exists for the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl NewUserAccount {
    pub fn new(
        provider: &str,
        provider_account_id: &str,
        name: Option<String>,
        email: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: account_id(provider, provider_account_id),
            name,
            email: email.into(),
            image,
        }
    }
}

/// Builds the stable account identifier for a provider identity.
pub fn account_id(provider: &str, provider_account_id: &str) -> String {
    format!("{provider}-{provider_account_id}")
}
