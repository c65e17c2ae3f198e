//! Field-scoped contact query language.
//!
//! # Responsibility
//! - Parse `%FIELD%value` tokens into typed search terms.
//! - Evaluate terms against a record's per-field values.
//!
//! # Invariants
//! - A query matches when any of its terms matches (OR semantics).
//! - Matching is case-insensitive and ignores `\`, `.`, `-` and `,` on both
//!   the pattern and the stored value.
//! - Terms with an empty pattern never match.

use crate::model::address::Address;
use crate::model::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^%([A-Za-z]+)%(.*)$").expect("valid search token regex"));

const IGNORED_CHARS: [char; 4] = ['\\', '.', '-', ','];

/// Result type for query parsing.
pub type SearchResult<T> = Result<T, SearchError>;

/// Query parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Token does not have the `%FIELD%value` shape.
    InvalidToken(String),
    UnknownField { token: String, field: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken(token) => {
                write!(f, "invalid search token `{token}`; expected %FIELD%value")
            }
            Self::UnknownField { token, field } => write!(
                f,
                "unknown search field `{field}` in `{token}`; expected NAME|ADDRESS|EMAIL|PHONES|BDAY"
            ),
        }
    }
}

impl Error for SearchError {}

/// Searchable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Address,
    Email,
    Phones,
    Birthday,
}

impl SearchField {
    /// Marker used in the wire format and the record search string.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Address => "ADDRESS",
            Self::Email => "EMAIL",
            Self::Phones => "PHONES",
            Self::Birthday => "BDAY",
        }
    }

    fn values(self, record: &Record) -> Vec<String> {
        match self {
            Self::Name => vec![record.name.clone()],
            Self::Address => record
                .address
                .as_ref()
                .map(Address::as_string)
                .into_iter()
                .collect(),
            Self::Email => record
                .email
                .iter()
                .map(|email| email.as_str().to_string())
                .collect(),
            Self::Phones => record
                .phones
                .iter()
                .map(|phone| phone.as_str().to_string())
                .collect(),
            Self::Birthday => record
                .birthday
                .iter()
                .map(|birthday| birthday.local_str())
                .collect(),
        }
    }
}

impl FromStr for SearchField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NAME" => Ok(Self::Name),
            "ADDRESS" => Ok(Self::Address),
            "EMAIL" => Ok(Self::Email),
            "PHONES" | "PHONE" => Ok(Self::Phones),
            "BDAY" | "BIRTHDAY" => Ok(Self::Birthday),
            _ => Err(()),
        }
    }
}

/// One parsed `%FIELD%value` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub field: SearchField,
    /// Normalized pattern (see [`normalize_for_match`]).
    pub pattern: String,
}

impl SearchTerm {
    pub fn new(field: SearchField, value: &str) -> Self {
        Self {
            field,
            pattern: normalize_for_match(value),
        }
    }

    pub fn parse(token: &str) -> SearchResult<Self> {
        let trimmed = token.trim();
        let caps = TOKEN_RE
            .captures(trimmed)
            .ok_or_else(|| SearchError::InvalidToken(token.to_string()))?;
        let field_text = &caps[1];
        let field = field_text
            .parse::<SearchField>()
            .map_err(|()| SearchError::UnknownField {
                token: token.to_string(),
                field: field_text.to_string(),
            })?;
        Ok(Self::new(field, &caps[2]))
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        self.field
            .values(record)
            .iter()
            .any(|value| normalize_for_match(value).contains(self.pattern.as_str()))
    }
}

/// Disjunction of search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: Vec<SearchTerm>,
}

impl SearchQuery {
    /// Parses every token; fails on the first malformed one.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> SearchResult<Self> {
        let terms = tokens
            .iter()
            .map(|token| SearchTerm::parse(token.as_ref()))
            .collect::<SearchResult<Vec<_>>>()?;
        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.terms.iter().any(|term| term.matches(record))
    }
}

/// Lower-cases, trims and drops `\`, `.`, `-` and `,`.
pub fn normalize_for_match(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !IGNORED_CHARS.contains(ch))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_match, SearchError, SearchField, SearchTerm};

    #[test]
    fn parse_accepts_known_fields_case_insensitively() {
        let term = SearchTerm::parse("%phones%234-567").unwrap();
        assert_eq!(term.field, SearchField::Phones);
        assert_eq!(term.pattern, "234567");
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert_eq!(
            SearchTerm::parse("NAME=Vasyl").unwrap_err(),
            SearchError::InvalidToken("NAME=Vasyl".to_string())
        );
        assert!(matches!(
            SearchTerm::parse("%NICK%vas").unwrap_err(),
            SearchError::UnknownField { .. }
        ));
    }

    #[test]
    fn value_may_contain_percent_signs() {
        let term = SearchTerm::parse("%NAME%50% off").unwrap();
        assert_eq!(term.field, SearchField::Name);
        assert_eq!(term.pattern, "50% off");
    }

    #[test]
    fn normalization_strips_punctuation_and_case() {
        assert_eq!(normalize_for_match(" Some.Adr@x-y.com "), "someadr@xycom");
        assert_eq!(normalize_for_match("13-01-1930"), "13011930");
    }
}
