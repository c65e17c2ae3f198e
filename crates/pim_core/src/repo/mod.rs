//! In-memory repositories for contacts and notes.
//!
//! # Responsibility
//! - Own entity maps, identity counters and derived indexes.
//! - Return semantic errors (`DuplicateRecord`, `NoteNotFound`, ...) to callers.
//!
//! # Invariants
//! - Write paths validate entities before mutating state.
//! - A failed operation leaves the repository unchanged.
//! - Repositories never log; presenting errors is the caller's job.

use crate::model::note::NoteId;
use crate::model::record::{RecordError, RecordId};
use crate::model::value::ValidationError;
use crate::search::query::SearchError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contact_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error for contact and note operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// A contact with this name already exists.
    DuplicateRecord(String),
    DuplicateNote(NoteId),
    RecordNotFound(RecordId),
    NoteNotFound(NoteId),
    /// Stored entity carries id `0`, which is never assigned.
    UnassignedId { entity: &'static str },
    Validation(ValidationError),
    Record(RecordError),
    Search(SearchError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRecord(name) => write!(f, "record {name} already exists"),
            Self::DuplicateNote(id) => write!(f, "note {id} already exists"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UnassignedId { entity } => write!(f, "stored {entity} has no id"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::DuplicateRecord(_)
            | Self::DuplicateNote(_)
            | Self::RecordNotFound(_)
            | Self::NoteNotFound(_)
            | Self::UnassignedId { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RecordError> for RepoError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

impl From<SearchError> for RepoError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

/// Returns the `[offset, offset + limit)` window of `items`.
pub(crate) fn page<'a, T: 'a>(
    items: impl Iterator<Item = &'a T>,
    offset: usize,
    limit: usize,
) -> Vec<&'a T> {
    items.skip(offset).take(limit).collect()
}
