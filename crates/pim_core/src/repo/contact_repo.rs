//! Contact repository.
//!
//! # Responsibility
//! - Own contact records keyed by surrogate id, in insertion order.
//! - Enforce the unique-name invariant on every write path.
//! - Answer field search and birthday-proximity queries.
//!
//! # Invariants
//! - `last_id` only grows; ids are never reused after delete.
//! - `record_counter` always equals the number of stored records.
//! - No two stored records share a name.

use crate::model::record::{Record, RecordError, RecordId};
use crate::model::value::local_today;
use crate::repo::{page, RepoError, RepoResult};
use crate::search::query::SearchQuery;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactSnapshot", into = "ContactSnapshot")]
pub struct ContactRepository {
    records: BTreeMap<RecordId, Record>,
    last_id: RecordId,
    record_counter: usize,
}

/// Persisted shape: counters plus records ordered by id.
#[derive(Serialize, Deserialize)]
struct ContactSnapshot {
    #[serde(default)]
    last_id: RecordId,
    #[serde(default)]
    records: Vec<Record>,
}

impl ContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.record_counter
    }

    pub fn is_empty(&self) -> bool {
        self.record_counter == 0
    }

    /// Highest id ever assigned.
    pub fn last_id(&self) -> RecordId {
        self.last_id
    }

    /// Stores a new record and returns its assigned id.
    ///
    /// # Errors
    /// - `DuplicateRecord` when a record with the same name exists.
    /// - `Validation` when the record name is blank.
    pub fn add(&mut self, mut record: Record) -> RepoResult<RecordId> {
        record.validate()?;
        self.ensure_name_free(&record.name, None)?;

        self.last_id += 1;
        self.record_counter += 1;
        record.id = self.last_id;
        self.records.insert(record.id, record);
        Ok(self.last_id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Record> {
        let name = name.trim();
        self.records.values().find(|record| record.name.trim() == name)
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Pagination window in insertion order.
    pub fn get_records(&self, offset: usize, limit: usize) -> Vec<&Record> {
        page(self.records.values(), offset, limit)
    }

    /// Replaces the stored value of `old_record` with `new_record` wholesale.
    ///
    /// The new record inherits `old_record.id`.
    ///
    /// # Errors
    /// - `RecordNotFound` when `old_record.id` is not stored.
    /// - `DuplicateRecord` when the new name belongs to another record.
    pub fn edit(&mut self, old_record: &Record, mut new_record: Record) -> RepoResult<()> {
        let id = old_record.id;
        if !self.records.contains_key(&id) {
            return Err(RepoError::RecordNotFound(id));
        }
        new_record.validate()?;
        self.ensure_name_free(&new_record.name, Some(id))?;

        new_record.id = id;
        self.records.insert(id, new_record);
        Ok(())
    }

    /// Applies record mutators to a stored record as one step.
    ///
    /// `change` runs on a copy; the stored record is replaced only when it
    /// succeeds and the result still satisfies the repository invariants.
    pub fn modify<F>(&mut self, id: RecordId, change: F) -> RepoResult<()>
    where
        F: FnOnce(&mut Record) -> Result<(), RecordError>,
    {
        let mut draft = self
            .records
            .get(&id)
            .cloned()
            .ok_or(RepoError::RecordNotFound(id))?;
        change(&mut draft)?;
        draft.id = id;
        draft.validate()?;
        self.ensure_name_free(&draft.name, Some(id))?;

        self.records.insert(id, draft);
        Ok(())
    }

    /// Removes a record and returns it. The id is not reused.
    pub fn delete(&mut self, record: &Record) -> RepoResult<Record> {
        let removed = self
            .records
            .remove(&record.id)
            .ok_or(RepoError::RecordNotFound(record.id))?;
        self.record_counter -= 1;
        Ok(removed)
    }

    /// Finds records matching any of the `%FIELD%value` tokens.
    ///
    /// # Errors
    /// - `Search` when a token is malformed.
    pub fn find<S: AsRef<str>>(&self, tokens: &[S]) -> RepoResult<Vec<&Record>> {
        let query = SearchQuery::parse(tokens)?;
        Ok(self.find_query(&query))
    }

    pub fn find_query(&self, query: &SearchQuery) -> Vec<&Record> {
        if query.is_empty() {
            return Vec::new();
        }
        self.records
            .values()
            .filter(|record| query.matches(record))
            .collect()
    }

    /// Records whose birthday falls between tomorrow and `days` days ahead.
    pub fn upcoming(&self, days: u32) -> Vec<&Record> {
        self.upcoming_at(days, local_today())
    }

    pub fn upcoming_at(&self, days: u32, today: NaiveDate) -> Vec<&Record> {
        self.with_days_to_birthday(today, |left| (1..=days).contains(&left))
    }

    /// Records whose birthday is today.
    pub fn today(&self) -> Vec<&Record> {
        self.today_at(local_today())
    }

    pub fn today_at(&self, today: NaiveDate) -> Vec<&Record> {
        self.with_days_to_birthday(today, |left| left == 0)
    }

    fn with_days_to_birthday(&self, today: NaiveDate, accept: impl Fn(u32) -> bool) -> Vec<&Record> {
        self.records
            .values()
            .filter(|record| {
                record
                    .birthday
                    .as_ref()
                    .is_some_and(|birthday| accept(birthday.days_to_birthday_from(today)))
            })
            .collect()
    }

    fn ensure_name_free(&self, name: &str, owner: Option<RecordId>) -> RepoResult<()> {
        let name = name.trim();
        let taken = self
            .records
            .values()
            .any(|record| record.name.trim() == name && Some(record.id) != owner);
        if taken {
            return Err(RepoError::DuplicateRecord(name.to_string()));
        }
        Ok(())
    }
}

impl TryFrom<ContactSnapshot> for ContactRepository {
    type Error = RepoError;

    fn try_from(snapshot: ContactSnapshot) -> Result<Self, Self::Error> {
        let mut repo = Self {
            last_id: snapshot.last_id,
            ..Self::default()
        };
        for record in snapshot.records {
            record.validate()?;
            if record.id == 0 {
                return Err(RepoError::UnassignedId { entity: "record" });
            }
            if repo.records.contains_key(&record.id) {
                return Err(RepoError::DuplicateRecord(record.name));
            }
            repo.ensure_name_free(&record.name, None)?;
            repo.last_id = repo.last_id.max(record.id);
            repo.record_counter += 1;
            repo.records.insert(record.id, record);
        }
        Ok(repo)
    }
}

impl From<ContactRepository> for ContactSnapshot {
    fn from(repo: ContactRepository) -> Self {
        Self {
            last_id: repo.last_id,
            records: repo.records.into_values().collect(),
        }
    }
}
