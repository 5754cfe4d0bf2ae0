//! Boundary with the third-party authentication collaborator.
//!
//! # Responsibility
//! - Reconcile provider identities into stored accounts (`sign_in`).
//! - Keep post-auth redirects on the application's own origin (`redirect`).
//!
//! OAuth handshakes and session/token cryptography live in the collaborator.

pub mod redirect;
pub mod sign_in;
