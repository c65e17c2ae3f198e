//! Note repository with an inverted tag index.
//!
//! # Responsibility
//! - Own notes keyed by id and allocate ids for new notes.
//! - Keep `tag_pool` (tag -> note ids) in step with add/delete.
//! - Answer keyword and tag queries.
//!
//! # Invariants
//! - `tag_pool` never holds an id of a deleted note and never holds an
//!   empty id list.
//! - `last_id` only grows; allocated ids are never reused.
//! - Blank query input yields an empty result, never every note.

use crate::model::note::{normalize_tag, Note, NoteId};
use crate::model::value::ValidationError;
use crate::repo::{page, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteSnapshot", into = "NoteSnapshot")]
pub struct NoteRepository {
    notes: BTreeMap<NoteId, Note>,
    last_id: NoteId,
    note_counter: usize,
    tag_pool: BTreeMap<String, Vec<NoteId>>,
}

/// Persisted shape; the tag pool is derived and rebuilt on load.
#[derive(Serialize, Deserialize)]
struct NoteSnapshot {
    #[serde(default)]
    last_id: NoteId,
    #[serde(default)]
    notes: Vec<Note>,
}

impl NoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.note_counter
    }

    pub fn is_empty(&self) -> bool {
        self.note_counter == 0
    }

    /// Highest id ever allocated or stored.
    pub fn last_id(&self) -> NoteId {
        self.last_id
    }

    /// Builds a note with the next free id. The note still has to be
    /// passed to [`NoteRepository::add`].
    ///
    /// The id is consumed even if the note is never added.
    pub fn new_note<I, S>(&mut self, raw: &str, extra_tags: I) -> Result<Note, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let note = Note::with_id(self.last_id + 1, raw, extra_tags)?;
        self.last_id = note.note_id;
        Ok(note)
    }

    /// Stores a note and indexes its tags.
    ///
    /// # Errors
    /// - `DuplicateNote` when a note with the same id exists.
    pub fn add(&mut self, note: Note) -> RepoResult<NoteId> {
        let note_id = note.note_id;
        if self.notes.contains_key(&note_id) {
            return Err(RepoError::DuplicateNote(note_id));
        }

        self.update_tag_pool(&note);
        self.notes.insert(note_id, note);
        self.note_counter += 1;
        self.last_id = self.last_id.max(note_id);
        Ok(note_id)
    }

    pub fn get(&self, note_id: NoteId) -> Option<&Note> {
        self.notes.get(&note_id)
    }

    /// Notes ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn get_notes(&self, offset: usize, limit: usize) -> Vec<&Note> {
        page(self.notes.values(), offset, limit)
    }

    /// Removes a note and prunes its id from the tag index.
    pub fn delete(&mut self, note: &Note) -> RepoResult<Note> {
        let removed = self
            .notes
            .remove(&note.note_id)
            .ok_or(RepoError::NoteNotFound(note.note_id))?;
        self.note_counter -= 1;
        self.clean_tags(removed.note_id);
        Ok(removed)
    }

    /// Replaces content and recomputes the note's tags from `new_content`.
    ///
    /// The tag index is not touched; use [`NoteRepository::replace`] when
    /// tag lookups must reflect the new content.
    pub fn edit(&mut self, note_id: NoteId, new_content: &str) -> RepoResult<()> {
        let note = self
            .notes
            .get_mut(&note_id)
            .ok_or(RepoError::NoteNotFound(note_id))?;
        note.edit(new_content)?;
        Ok(())
    }

    /// Edits a note and re-indexes its tags, keeping its id.
    pub fn replace(&mut self, note_id: NoteId, new_content: &str) -> RepoResult<()> {
        let mut updated = self
            .notes
            .get(&note_id)
            .cloned()
            .ok_or(RepoError::NoteNotFound(note_id))?;
        updated.edit(new_content)?;

        self.clean_tags(note_id);
        self.update_tag_pool(&updated);
        self.notes.insert(note_id, updated);
        Ok(())
    }

    /// Notes whose content contains any of `words`, case-insensitively.
    pub fn find_by_keyword<S: AsRef<str>>(&self, words: &[S]) -> Vec<&Note> {
        let words = words
            .iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();
        if words.is_empty() {
            return Vec::new();
        }

        self.notes
            .values()
            .filter(|note| {
                let content = note.content.to_lowercase();
                words.iter().any(|word| content.contains(word.as_str()))
            })
            .collect()
    }

    /// Notes carrying any of `tags`.
    pub fn find_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Note> {
        let ids = tags
            .iter()
            .filter_map(|tag| normalize_tag(tag.as_ref()))
            .filter_map(|tag| self.tag_pool.get(&tag))
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>();

        ids.into_iter()
            .filter_map(|note_id| self.notes.get(&note_id))
            .collect()
    }

    /// Known tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag_pool.keys().map(String::as_str)
    }

    pub fn tag_pool(&self) -> &BTreeMap<String, Vec<NoteId>> {
        &self.tag_pool
    }

    fn update_tag_pool(&mut self, note: &Note) {
        for tag in &note.tags {
            self.tag_pool
                .entry(tag.clone())
                .or_default()
                .push(note.note_id);
        }
    }

    /// Drops `note_id` from every tag list; returns how many lists held it.
    fn clean_tags(&mut self, note_id: NoteId) -> usize {
        let mut removed = 0;
        self.tag_pool.retain(|_, ids| {
            let before = ids.len();
            ids.retain(|id| *id != note_id);
            if ids.len() != before {
                removed += 1;
            }
            !ids.is_empty()
        });
        removed
    }
}

impl TryFrom<NoteSnapshot> for NoteRepository {
    type Error = RepoError;

    fn try_from(snapshot: NoteSnapshot) -> Result<Self, Self::Error> {
        let mut repo = Self {
            last_id: snapshot.last_id,
            ..Self::default()
        };
        for mut note in snapshot.notes {
            if note.note_id == 0 {
                return Err(RepoError::UnassignedId { entity: "note" });
            }
            if note.content.trim().is_empty() {
                return Err(ValidationError::Empty { field: "note" }.into());
            }
            note.tags = note
                .tags
                .iter()
                .filter_map(|tag| normalize_tag(tag))
                .collect();
            repo.add(note)?;
        }
        Ok(repo)
    }
}

impl From<NoteRepository> for NoteSnapshot {
    fn from(repo: NoteRepository) -> Self {
        Self {
            last_id: repo.last_id,
            notes: repo.notes.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteRepository;

    #[test]
    fn clean_tags_reports_affected_lists() {
        let mut repo = NoteRepository::new();
        let note = repo.new_note("#a #b", Vec::<String>::new()).unwrap();
        let other = repo.new_note("#b", Vec::<String>::new()).unwrap();
        let id = repo.add(note).unwrap();
        repo.add(other).unwrap();

        assert_eq!(repo.clean_tags(id), 2);
        assert_eq!(repo.tags().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn snapshot_rebuilds_tag_pool() {
        let mut repo = NoteRepository::new();
        let note = repo.new_note("learn #rust", ["work"]).unwrap();
        repo.add(note).unwrap();

        let json = serde_json::to_value(&repo).unwrap();
        assert!(json.get("tag_pool").is_none());

        let restored: NoteRepository = serde_json::from_value(json).unwrap();
        assert_eq!(restored, repo);
        assert_eq!(restored.tag_pool()["rust"], vec![1]);
    }

    #[test]
    fn snapshot_tags_are_normalized_on_load() {
        let json = r#"{"last_id":1,"notes":[
            {"note_id":1,"content":"x","tags":["Python"," #python ",""]}
        ]}"#;
        let restored: NoteRepository = serde_json::from_str(json).unwrap();

        assert_eq!(restored.tags().collect::<Vec<_>>(), vec!["python"]);
        assert_eq!(restored.find_by_tags(&["python"]).len(), 1);
        assert!(restored.get(1).unwrap().has_tag("PYTHON"));
    }

    #[test]
    fn snapshot_with_unassigned_note_id_is_rejected() {
        let json = r#"{"last_id":0,"notes":[{"note_id":0,"content":"x","tags":[]}]}"#;
        let err = serde_json::from_str::<NoteRepository>(json).unwrap_err();
        assert!(err.to_string().contains("stored note has no id"), "{err}");
    }
}
