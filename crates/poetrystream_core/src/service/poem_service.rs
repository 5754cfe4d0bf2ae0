//! Poem use-case service.
//!
//! # Responsibility
//! - Provide create/save/get/list/delete entry points for one user's poems.
//! - Render stored poems through the pure renderer.
//!
//! # Invariants
//! - Writes are read back so callers always see stored timestamps.
//! - Reads are owner-scoped: another user's poem is reported as absent.
//! - Service layer remains storage-agnostic.

use crate::model::poem::{Poem, PoemId, Stanza};
use crate::render::tree::{render_poem, PoemView};
use crate::repo::poem_repo::{normalize_poem_limit, PoemListQuery, PoemRepository, StoredPoem};
use crate::repo::RepoError;
use log::info;
use thiserror::Error;

/// Service error for poem use-cases.
#[derive(Debug, Error)]
pub enum PoemServiceError {
    #[error("owner id must not be blank")]
    InvalidOwner,
    #[error("poem not found: {0}")]
    PoemNotFound(PoemId),
    #[error(transparent)]
    Repo(RepoError),
    #[error("inconsistent poem state: {0}")]
    InconsistentState(&'static str),
}

impl From<RepoError> for PoemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PoemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Page of poems returned by `list_poems`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemPage {
    pub items: Vec<StoredPoem>,
    pub applied_limit: u32,
}

/// Poem service facade over repository implementations.
pub struct PoemService<R: PoemRepository> {
    repo: R,
}

impl<R: PoemRepository> PoemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new poem for `user_id` and returns the stored record.
    pub fn create_poem(
        &self,
        user_id: &str,
        title: Option<&str>,
        stanzas: Vec<Stanza>,
    ) -> Result<StoredPoem, PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        let poem = Poem::new(stanzas);
        let id = self.repo.create_poem(owner, normalize_title(title), &poem)?;
        info!(
            "event=poem_create module=service status=ok poem_id={id} stanzas={}",
            poem.stanzas.len()
        );
        self.read_back(id, "created poem not found in read-back")
    }

    /// Replaces title and stanzas of an existing poem.
    pub fn save_stanzas(
        &self,
        user_id: &str,
        id: PoemId,
        title: Option<&str>,
        stanzas: Vec<Stanza>,
    ) -> Result<StoredPoem, PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        let poem = Poem::with_id(id, stanzas);
        self.repo.update_poem(owner, normalize_title(title), &poem)?;
        self.read_back(id, "updated poem not found in read-back")
    }

    /// Returns the poem if it exists and belongs to `user_id`.
    pub fn get_poem(
        &self,
        user_id: &str,
        id: PoemId,
    ) -> Result<Option<StoredPoem>, PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        self.find_owned(owner, id)
    }

    pub fn list_poems(
        &self,
        user_id: &str,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<PoemPage, PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        let applied_limit = normalize_poem_limit(limit);
        let items = self.repo.list_poems_for_user(&PoemListQuery {
            user_id: owner.to_string(),
            limit: Some(applied_limit),
            offset,
        })?;
        Ok(PoemPage {
            items,
            applied_limit,
        })
    }

    pub fn delete_poem(&self, user_id: &str, id: PoemId) -> Result<(), PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        self.repo.delete_poem(owner, id)?;
        info!("event=poem_delete module=service status=ok poem_id={id}");
        Ok(())
    }

    /// Loads one of `user_id`'s poems and renders it for display.
    pub fn render_poem(&self, user_id: &str, id: PoemId) -> Result<PoemView, PoemServiceError> {
        let owner = normalize_owner(user_id)?;
        let stored = self
            .find_owned(owner, id)?
            .ok_or(PoemServiceError::PoemNotFound(id))?;
        Ok(render_poem(&stored.poem))
    }

    fn find_owned(&self, owner: &str, id: PoemId) -> Result<Option<StoredPoem>, PoemServiceError> {
        Ok(self
            .repo
            .get_poem(id)?
            .filter(|stored| stored.user_id == owner))
    }

    fn read_back(&self, id: PoemId, details: &'static str) -> Result<StoredPoem, PoemServiceError> {
        self.repo
            .get_poem(id)?
            .ok_or(PoemServiceError::InconsistentState(details))
    }
}

fn normalize_owner(user_id: &str) -> Result<&str, PoemServiceError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(PoemServiceError::InvalidOwner);
    }
    Ok(trimmed)
}

fn normalize_title(title: Option<&str>) -> Option<&str> {
    title.map(str::trim).filter(|value| !value.is_empty())
}
