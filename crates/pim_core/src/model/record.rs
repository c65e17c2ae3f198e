//! Contact record entity.
//!
//! # Responsibility
//! - Hold one contact's validated fields.
//! - Provide in-place mutators used by edit flows.
//! - Derive the flattened search string.
//!
//! # Invariants
//! - `name` is non-empty after trimming; checked by `validate()`.
//! - `id` is `0` until a repository assigns one.

use crate::model::address::Address;
use crate::model::value::{Birthday, EmailAddress, Phone, ValidationError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository-assigned surrogate id for contacts.
pub type RecordId = u64;

/// Separator between phones inside the search string.
pub const PHONE_SEPARATOR: &str = "|";

/// Failure of a record-level mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Validation(ValidationError),
    PhoneNotFound(Phone),
    /// A `delete_*` call found the field already empty.
    MissingAddress,
    MissingEmail,
    MissingBirthday,
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PhoneNotFound(phone) => write!(f, "phone {phone} is not found"),
            Self::MissingAddress => write!(f, "record has no address"),
            Self::MissingEmail => write!(f, "record has no email"),
            Self::MissingBirthday => write!(f, "record has no birthday"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PhoneNotFound(_)
            | Self::MissingAddress
            | Self::MissingEmail
            | Self::MissingBirthday => None,
        }
    }
}

impl From<ValidationError> for RecordError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One address-book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: RecordId,
    /// Natural key; unique within a repository.
    pub name: String,
    #[serde(default)]
    pub birthday: Option<Birthday>,
    #[serde(default)]
    pub email: Option<EmailAddress>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phones: Vec<Phone>,
}

impl Record {
    /// Creates an unassigned record with only a name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let record = Self {
            id: 0,
            name: name.into().trim().to_string(),
            birthday: None,
            email: None,
            address: None,
            phones: Vec::new(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks invariants that field types cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(())
    }

    pub fn add_phone(&mut self, phone: Phone) {
        self.phones.push(phone);
    }

    /// Replaces the first phone equal to `old_phone`, keeping its position.
    pub fn edit_phone(&mut self, old_phone: &Phone, new_phone: Phone) -> Result<(), RecordError> {
        let slot = self
            .phones
            .iter_mut()
            .find(|phone| **phone == *old_phone)
            .ok_or_else(|| RecordError::PhoneNotFound(old_phone.clone()))?;
        *slot = new_phone;
        Ok(())
    }

    pub fn delete_phone(&mut self, phone: &Phone) -> Result<Phone, RecordError> {
        let index = self
            .phones
            .iter()
            .position(|current| current == phone)
            .ok_or_else(|| RecordError::PhoneNotFound(phone.clone()))?;
        Ok(self.phones.remove(index))
    }

    /// Sets or replaces the address. Blank addresses are rejected; use
    /// [`Record::delete_address`] to clear it.
    pub fn set_address(&mut self, address: Address) -> Result<(), RecordError> {
        if address.is_empty() {
            return Err(ValidationError::Empty { field: "address" }.into());
        }
        self.address = Some(address);
        Ok(())
    }

    pub fn delete_address(&mut self) -> Result<Address, RecordError> {
        self.address.take().ok_or(RecordError::MissingAddress)
    }

    pub fn set_email(&mut self, email: EmailAddress) {
        self.email = Some(email);
    }

    pub fn delete_email(&mut self) -> Result<EmailAddress, RecordError> {
        self.email.take().ok_or(RecordError::MissingEmail)
    }

    pub fn set_birthday(&mut self, birthday: Birthday) {
        self.birthday = Some(birthday);
    }

    pub fn delete_birthday(&mut self) -> Result<Birthday, RecordError> {
        self.birthday.take().ok_or(RecordError::MissingBirthday)
    }

    /// Phones joined by [`PHONE_SEPARATOR`].
    pub fn phones_str(&self) -> String {
        self.phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join(PHONE_SEPARATOR)
    }

    /// Flattened index string:
    /// `%NAME%..::%ADDRESS%..::%EMAIL%..::%PHONES%..::%BDAY%..::`.
    pub fn search_str(&self) -> String {
        let address = self
            .address
            .as_ref()
            .map(Address::as_string)
            .unwrap_or_default();
        let email = self.email.as_ref().map_or("", EmailAddress::as_str);
        let birthday = self
            .birthday
            .as_ref()
            .map(Birthday::local_str)
            .unwrap_or_default();
        format!(
            "%NAME%{}::%ADDRESS%{}::%EMAIL%{}::%PHONES%{}::%BDAY%{}::",
            self.name,
            address,
            email,
            self.phones_str(),
            birthday
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordError};
    use crate::model::address::Address;
    use crate::model::value::{Phone, ValidationError};

    fn phone(value: &str) -> Phone {
        Phone::parse(value).unwrap()
    }

    #[test]
    fn new_rejects_blank_name() {
        assert_eq!(
            Record::new("   ").unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn edit_phone_keeps_position() {
        let mut record = Record::new("Ann").unwrap();
        record.add_phone(phone("1111111111"));
        record.add_phone(phone("2222222222"));

        record
            .edit_phone(&phone("1111111111"), phone("3333333333"))
            .unwrap();
        assert_eq!(record.phones_str(), "3333333333|2222222222");

        let err = record
            .edit_phone(&phone("9999999999"), phone("4444444444"))
            .unwrap_err();
        assert_eq!(err, RecordError::PhoneNotFound(phone("9999999999")));
    }

    #[test]
    fn set_address_rejects_blank_and_delete_requires_existing() {
        let mut record = Record::new("Ann").unwrap();
        let err = record.set_address(Address::default()).unwrap_err();
        assert_eq!(
            err,
            RecordError::Validation(ValidationError::Empty { field: "address" })
        );
        assert_eq!(
            record.delete_address().unwrap_err(),
            RecordError::MissingAddress
        );
    }

    #[test]
    fn deleting_absent_email_or_birthday_fails() {
        let mut record = Record::new("Ann").unwrap();
        assert_eq!(record.delete_email().unwrap_err(), RecordError::MissingEmail);
        assert_eq!(
            record.delete_birthday().unwrap_err(),
            RecordError::MissingBirthday
        );
    }

    #[test]
    fn search_str_of_bare_record_has_empty_sections() {
        let record = Record::new("Ann").unwrap();
        assert_eq!(
            record.search_str(),
            "%NAME%Ann::%ADDRESS%::%EMAIL%::%PHONES%::%BDAY%::"
        );
    }
}
