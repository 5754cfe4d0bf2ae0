//! Core domain logic for PoetryStream.
//! This crate owns the poem document model, its rendering contract, and the
//! sign-in/storage boundaries around them.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use auth::redirect::resolve_redirect;
pub use auth::sign_in::{
    CandidateUser, ProviderAccount, ReconcileOutcome, SignInCallback, SignInError,
    SignInReconciler,
};
pub use config::{AppConfig, ConfigError};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::poem::{Alignment, Line, Poem, PoemId, Stanza, TextRun};
pub use model::user::{account_id, NewUserAccount, UserAccount};
pub use render::html::to_html;
pub use render::tree::{
    render_document, render_poem, LineBlock, PoemView, RenderError, SpanStyle, StanzaBlock,
    StyledSpan,
};
pub use repo::poem_repo::{PoemListQuery, PoemRepository, SqlitePoemRepository, StoredPoem};
pub use repo::user_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::{RepoError, RepoResult};
pub use service::poem_service::{PoemPage, PoemService, PoemServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
