//! Postal address value object.

use crate::model::value::ZipCode;
use serde::{Deserialize, Serialize};

/// Optional location fields of a contact.
///
/// Rendered as the non-empty fields joined by single spaces, in the order
/// country, zip, city, street, house, apartment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<ZipCode>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
}

impl Address {
    /// Canonical single-line form.
    pub fn as_string(&self) -> String {
        self.parts().collect::<Vec<_>>().join(" ")
    }

    /// Returns whether every field is absent or blank.
    pub fn is_empty(&self) -> bool {
        self.parts().next().is_none()
    }

    fn parts(&self) -> impl Iterator<Item = &str> {
        [
            self.country.as_deref(),
            self.zip.as_ref().map(ZipCode::as_str),
            self.city.as_deref(),
            self.street.as_deref(),
            self.house.as_deref(),
            self.apartment.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
    }
}
