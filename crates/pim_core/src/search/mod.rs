//! Contact search entry points.
//!
//! # Responsibility
//! - Parse the `%FIELD%value` query language.
//! - Evaluate parsed queries against in-memory records.

pub mod query;
