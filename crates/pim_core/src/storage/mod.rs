//! Persistence providers for repository snapshots.
//!
//! # Responsibility
//! - Define the read/write contract used at save/load boundaries.
//! - Provide JSON-file and SQLite-backed implementations.
//!
//! # Invariants
//! - Providers treat the repository as an opaque serde value graph.
//! - `read` returns `Ok(None)` when nothing has been stored yet.
//! - A failed `write` never leaves a partially written snapshot behind.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod json_file;
pub mod sqlite;

pub use json_file::JsonFileProvider;
pub use sqlite::SqliteProvider;

pub type StorageResult<T> = Result<T, StorageError>;

/// Snapshot read/write failure.
#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stored payload could not be encoded or decoded.
    Serde(serde_json::Error),
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serde(err) => write!(f, "invalid snapshot payload: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serde(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/save contract for one repository value.
pub trait DataProvider<T> {
    /// Provider identifier, e.g. `file:json`.
    fn source(&self) -> &'static str;
    /// Human-readable location for diagnostics.
    fn location(&self) -> String;
    /// Loads the stored value, or `None` when nothing was written yet.
    fn read(&self) -> StorageResult<Option<T>>;
    /// Replaces the stored value.
    fn write(&self, value: &T) -> StorageResult<()>;
}

/// Provider selection as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "file:json")]
    JsonFile,
    #[serde(rename = "sqlite")]
    Sqlite,
}

/// Builds a provider for `connection`. `key` names the snapshot inside
/// shared stores (ignored by single-value files).
pub fn build_provider<T>(
    kind: ProviderKind,
    connection: &Path,
    key: &str,
) -> Box<dyn DataProvider<T>>
where
    T: Serialize + DeserializeOwned + 'static,
{
    match kind {
        ProviderKind::JsonFile => Box::new(JsonFileProvider::new(connection)),
        ProviderKind::Sqlite => Box::new(SqliteProvider::new(connection, key)),
    }
}
