//! Poem repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist poem documents per owning user.
//! - Keep the JSON body encoding inside the persistence boundary.
//!
//! # Invariants
//! - `body` holds the serialized stanza list; decoding it back yields the
//!   exact hierarchy that was written.
//! - Writes that target a poem are scoped by `user_id`; another user's poem
//!   is reported as not found.
//! - Lists are ordered by `updated_at DESC, uuid ASC`.

use crate::model::poem::{Poem, PoemId, Stanza};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const POEMS_DEFAULT_LIMIT: u32 = 20;
const POEMS_LIMIT_MAX: u32 = 100;

const POEM_SELECT_SQL: &str = "SELECT
    uuid,
    user_id,
    title,
    body,
    created_at,
    updated_at
FROM poems";

/// Poem document together with its storage metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPoem {
    pub poem: Poem,
    /// Owning account id (`<provider>-<providerAccountId>`).
    pub user_id: String,
    pub title: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Query options for listing one user's poems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoemListQuery {
    pub user_id: String,
    /// Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for poem persistence.
pub trait PoemRepository {
    fn create_poem(&self, user_id: &str, title: Option<&str>, poem: &Poem) -> RepoResult<PoemId>;
    /// Replaces title and stanzas of a poem owned by `user_id`.
    fn update_poem(&self, user_id: &str, title: Option<&str>, poem: &Poem) -> RepoResult<()>;
    fn get_poem(&self, id: PoemId) -> RepoResult<Option<StoredPoem>>;
    fn list_poems_for_user(&self, query: &PoemListQuery) -> RepoResult<Vec<StoredPoem>>;
    fn delete_poem(&self, user_id: &str, id: PoemId) -> RepoResult<()>;
    /// Idempotently creates the owning-user index.
    fn ensure_owner_index(&self) -> RepoResult<()>;
}

/// SQLite-backed poem repository.
pub struct SqlitePoemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePoemRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["poems"])?;
        Ok(Self { conn })
    }
}

impl PoemRepository for SqlitePoemRepository<'_> {
    fn create_poem(&self, user_id: &str, title: Option<&str>, poem: &Poem) -> RepoResult<PoemId> {
        let body = encode_body(&poem.stanzas)?;
        self.conn.execute(
            "INSERT INTO poems (uuid, user_id, title, body)
             VALUES (?1, ?2, ?3, ?4);",
            params![poem.id.to_string(), user_id, title, body],
        )?;
        Ok(poem.id)
    }

    fn update_poem(&self, user_id: &str, title: Option<&str>, poem: &Poem) -> RepoResult<()> {
        let body = encode_body(&poem.stanzas)?;
        let changed = self.conn.execute(
            "UPDATE poems
             SET
                title = ?3,
                body = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND user_id = ?2;",
            params![poem.id.to_string(), user_id, title, body],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(poem.id));
        }
        Ok(())
    }

    fn get_poem(&self, id: PoemId) -> RepoResult<Option<StoredPoem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POEM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_poem_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_poems_for_user(&self, query: &PoemListQuery) -> RepoResult<Vec<StoredPoem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POEM_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY updated_at DESC, uuid ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            query.user_id.as_str(),
            i64::from(normalize_poem_limit(query.limit)),
            i64::from(query.offset),
        ])?;

        let mut poems = Vec::new();
        while let Some(row) = rows.next()? {
            poems.push(parse_poem_row(row)?);
        }
        Ok(poems)
    }

    fn delete_poem(&self, user_id: &str, id: PoemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM poems WHERE uuid = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn ensure_owner_index(&self) -> RepoResult<()> {
        ensure_owner_index(self.conn)
    }
}

/// Normalizes list limit according to the poem listing contract.
pub fn normalize_poem_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => POEMS_DEFAULT_LIMIT,
        Some(value) => value.min(POEMS_LIMIT_MAX),
    }
}

pub(crate) fn ensure_owner_index(conn: &Connection) -> RepoResult<()> {
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_poems_user_id ON poems(user_id);")?;
    Ok(())
}

fn encode_body(stanzas: &[Stanza]) -> RepoResult<String> {
    serde_json::to_string(stanzas)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode poem body: {err}")))
}

fn parse_poem_row(row: &Row<'_>) -> RepoResult<StoredPoem> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in poems.uuid"))
    })?;

    let body: String = row.get("body")?;
    let stanzas: Vec<Stanza> = serde_json::from_str(&body).map_err(|err| {
        RepoError::InvalidData(format!("invalid document in poems.body for {id}: {err}"))
    })?;

    Ok(StoredPoem {
        poem: Poem::with_id(id, stanzas),
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
