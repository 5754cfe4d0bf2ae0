//! Poem rendering.
//!
//! # Responsibility
//! - Produce the presentational tree for a poem (`tree`).
//! - Emit that tree as HTML markup (`html`).
//!
//! # Invariants
//! - Rendering has no side effects and performs no I/O.

pub mod html;
pub mod tree;
