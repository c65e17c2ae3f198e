//! Application-level orchestration over repositories and storage.
//!
//! # Responsibility
//! - Wire configuration, providers and repositories into one session.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod session;
