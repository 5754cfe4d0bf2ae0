//! Account repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up accounts by email.
//! - Insert a new account only when none exists for its email.
//!
//! # Invariants
//! - `insert_if_absent` is a single conditional statement; two callers racing
//!   on the same email produce exactly one row.
//! - Email comparison is case-insensitive (`COLLATE NOCASE` on the column).
//! - `id` is not a key: a provider account that signs in under a new email
//!   gets a second row rather than a constraint failure.

use crate::model::user::{NewUserAccount, UserAccount};
use crate::repo::poem_repo::ensure_owner_index;
use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Storage contract used by sign-in reconciliation.
pub trait AccountRepository {
    /// Returns the account stored under `email`, if any.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserAccount>>;
    /// Inserts `account` unless its email is already taken.
    ///
    /// Returns `true` when a row was inserted.
    fn insert_if_absent(&self, account: &NewUserAccount) -> RepoResult<bool>;
    /// Makes sure per-user poem lookups are indexed.
    fn ensure_poem_owner_index(&self) -> RepoResult<()>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "poems"])?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserAccount>> {
        let account = self
            .conn
            .query_row(
                "SELECT id, name, email, image, created_at
                 FROM users
                 WHERE email = ?1;",
                [email],
                parse_account_row,
            )
            .optional()?;
        Ok(account)
    }

    fn insert_if_absent(&self, account: &NewUserAccount) -> RepoResult<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO users (id, name, email, image, created_at)
             VALUES (?1, ?2, ?3, ?4, (strftime('%s', 'now') * 1000))
             ON CONFLICT(email) DO NOTHING;",
            params![
                account.id.as_str(),
                account.name.as_deref(),
                account.email.as_str(),
                account.image.as_deref(),
            ],
        )?;
        Ok(inserted == 1)
    }

    fn ensure_poem_owner_index(&self) -> RepoResult<()> {
        ensure_owner_index(self.conn)
    }
}

fn parse_account_row(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        image: row.get("image")?,
        created_at: row.get("created_at")?,
    })
}
