//! Application session: both repositories plus their providers.
//!
//! # Responsibility
//! - Load the contact and note repositories at startup.
//! - Write both back at explicit save points.
//!
//! # Invariants
//! - One session is created per process and passed by reference; there is
//!   no global instance.
//! - Repositories are empty (not an error) when nothing was stored yet.

use crate::config::PimConfig;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::note_repo::NoteRepository;
use crate::storage::{build_provider, DataProvider, StorageResult};
use log::info;
use std::time::Instant;

/// Snapshot key of the contact repository in shared stores.
pub const CONTACTS_KEY: &str = "contacts";
/// Snapshot key of the note repository in shared stores.
pub const NOTES_KEY: &str = "notes";

pub struct PimSession {
    pub contacts: ContactRepository,
    pub notes: NoteRepository,
    contact_provider: Box<dyn DataProvider<ContactRepository>>,
    note_provider: Box<dyn DataProvider<NoteRepository>>,
}

impl PimSession {
    /// Builds providers from `config` and loads both repositories.
    pub fn open(config: &PimConfig) -> StorageResult<Self> {
        let contact_provider = build_provider(
            config.contacts.provider,
            &config.contacts.connection,
            CONTACTS_KEY,
        );
        let note_provider =
            build_provider(config.notes.provider, &config.notes.connection, NOTES_KEY);
        Self::with_providers(contact_provider, note_provider)
    }

    /// Loads both repositories through caller-supplied providers.
    pub fn with_providers(
        contact_provider: Box<dyn DataProvider<ContactRepository>>,
        note_provider: Box<dyn DataProvider<NoteRepository>>,
    ) -> StorageResult<Self> {
        let started_at = Instant::now();
        let contacts = contact_provider.read()?.unwrap_or_default();
        let notes = note_provider.read()?.unwrap_or_default();
        info!(
            "event=session_open module=session status=ok contacts={} notes={} contacts_source={} notes_source={} duration_ms={}",
            contacts.len(),
            notes.len(),
            contact_provider.source(),
            note_provider.source(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            contacts,
            notes,
            contact_provider,
            note_provider,
        })
    }

    /// Writes both repositories.
    pub fn save(&self) -> StorageResult<()> {
        self.contact_provider.write(&self.contacts)?;
        self.note_provider.write(&self.notes)?;
        info!(
            "event=session_save module=session status=ok contacts={} notes={} contacts_location={} notes_location={}",
            self.contacts.len(),
            self.notes.len(),
            self.contact_provider.location(),
            self.note_provider.location()
        );
        Ok(())
    }
}
