//! Domain model for contacts and notes.
//!
//! # Responsibility
//! - Define validated value types and the two entity shapes.
//! - Keep validation at construction so repositories only see valid data.
//!
//! # Invariants
//! - Entity ids are assigned by repositories and never reused.

pub mod address;
pub mod note;
pub mod record;
pub mod value;
