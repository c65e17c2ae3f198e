//! Free-text note entity with hashtag tags.
//!
//! # Responsibility
//! - Extract `#tag` / `#tag#` markers from raw text into a tag set.
//! - Keep the readable content with the markers stripped.
//!
//! # Invariants
//! - `content` is never blank.
//! - Tags are trimmed, lower-cased and deduplicated.

use crate::model::value::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Repository-assigned note identity.
pub type NoteId = u64;

/// Characters of content shown by the `Display` form.
pub const NOTE_PREVIEW_CHARS: usize = 50;

static TAG_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([\w\-]+)#?").expect("valid tag marker regex"));

/// One note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: NoteId,
    /// Text with tag markers removed (the tag words stay in place).
    pub content: String,
    pub tags: BTreeSet<String>,
}

impl Note {
    /// Builds a note from raw text plus explicitly supplied tags.
    pub fn with_id<I, S>(note_id: NoteId, raw: &str, extra_tags: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (content, mut tags) = parse_content(raw)?;
        tags.extend(
            extra_tags
                .into_iter()
                .filter_map(|tag| normalize_tag(tag.as_ref())),
        );
        Ok(Self {
            note_id,
            content,
            tags,
        })
    }

    /// Replaces content and recomputes tags from `new_content` only.
    ///
    /// Leaves `self` untouched when `new_content` is blank.
    pub fn edit(&mut self, new_content: &str) -> Result<(), ValidationError> {
        let (content, tags) = parse_content(new_content)?;
        self.content = content;
        self.tags = tags;
        Ok(())
    }

    /// First [`NOTE_PREVIEW_CHARS`] characters of content.
    pub fn preview(&self) -> String {
        self.content.chars().take(NOTE_PREVIEW_CHARS).collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|tag| self.tags.contains(&tag))
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tags = self.tags.iter().map(String::as_str).collect::<Vec<_>>();
        write!(f, "{}::{}::{}", self.note_id, self.preview(), tags.join("|"))
    }
}

fn parse_content(raw: &str) -> Result<(String, BTreeSet<String>), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty { field: "note" });
    }
    let tags = extract_tags(raw);
    let content = TAG_MARKER_RE.replace_all(raw, "$1").into_owned();
    Ok((content, tags))
}

/// Collects normalized tags from `#tag` and `#tag#` markers.
pub fn extract_tags(text: &str) -> BTreeSet<String> {
    TAG_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|tag| normalize_tag(tag.as_str()))
        .collect()
}

/// Normalizes one tag value; blank tags yield `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim().trim_matches('#').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
