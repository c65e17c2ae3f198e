//! Core domain logic for the personal information manager.
//!
//! Contacts and notes live in in-memory repositories; persistence happens
//! only at explicit load/save points through [`storage`] providers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;

pub use config::{BookConfig, ConfigError, PimConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::Address;
pub use model::note::{Note, NoteId};
pub use model::record::{Record, RecordError, RecordId};
pub use model::value::{Birthday, EmailAddress, Phone, ValidationError, ZipCode};
pub use repo::contact_repo::ContactRepository;
pub use repo::note_repo::NoteRepository;
pub use repo::{RepoError, RepoResult};
pub use search::query::{SearchError, SearchField, SearchQuery, SearchTerm};
pub use service::session::PimSession;
pub use storage::{DataProvider, JsonFileProvider, ProviderKind, SqliteProvider, StorageError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
