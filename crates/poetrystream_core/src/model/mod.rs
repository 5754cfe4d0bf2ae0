//! Domain model for poem documents and user accounts.
//!
//! # Responsibility
//! - Define canonical data structures used by rendering and storage.
//!
//! # Invariants
//! - Poem ⊃ Stanza ⊃ Line ⊃ TextRun is strict containment with no sharing.
//! - Every poem belongs to exactly one user account identifier once stored.

pub mod poem;
pub mod user;
