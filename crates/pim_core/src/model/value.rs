//! Validated scalar values used by contact records.
//!
//! # Responsibility
//! - Parse and validate phone, zip, email and birthday input.
//! - Provide the canonical string form used by search and persistence.
//!
//! # Invariants
//! - A constructed value is always valid; there is no lenient construction.
//! - Deserialization runs the same validation as `parse`.
//! - `Birthday` dates are strictly before the local date at construction.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Wire/display format for birthdays (`DD-MM-YYYY`).
pub const BIRTHDAY_FORMAT: &str = "%d-%m-%Y";

const PHONE_DIGITS: usize = 10;
const ZIP_DIGITS: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Rejection reasons for malformed or empty user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required input was blank.
    Empty { field: &'static str },
    InvalidPhone(String),
    InvalidZip(String),
    InvalidEmail(String),
    /// Input is not a `DD-MM-YYYY` calendar date.
    InvalidBirthday(String),
    /// Parsed date is today or later.
    BirthdayNotInPast(NaiveDate),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::InvalidPhone(value) => write!(
                f,
                "phone `{value}` is not valid; expected exactly {PHONE_DIGITS} digits"
            ),
            Self::InvalidZip(value) => write!(
                f,
                "zip `{value}` is not valid; expected exactly {ZIP_DIGITS} digits"
            ),
            Self::InvalidEmail(value) => write!(
                f,
                "email `{value}` is not valid; expected local-part@domain.tld"
            ),
            Self::InvalidBirthday(value) => {
                write!(f, "birthday `{value}` is not valid; expected DD-MM-YYYY")
            }
            Self::BirthdayNotInPast(date) => write!(
                f,
                "birthday `{}` is not valid; date must be in the past",
                date.format(BIRTHDAY_FORMAT)
            ),
        }
    }
}

impl Error for ValidationError {}

/// Returns the current local calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_ascii_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn non_blank<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed)
}

/// Ten-digit phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = non_blank(value, "phone")?;
        if !is_ascii_digits(trimmed, PHONE_DIGITS) {
            return Err(ValidationError::InvalidPhone(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Phone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Five-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = non_blank(value, "zip")?;
        if !is_ascii_digits(trimmed, ZIP_DIGITS) {
            return Err(ValidationError::InvalidZip(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZipCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZipCode> for String {
    fn from(value: ZipCode) -> Self {
        value.0
    }
}

impl Display for ZipCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address in `local-part@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = non_blank(value, "email")?;
        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date of birth, always strictly in the past.
///
/// Serialized as `DD-MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Wraps a date, rejecting today and any future date.
    pub fn new(date: NaiveDate) -> Result<Self, ValidationError> {
        Self::new_relative_to(date, local_today())
    }

    /// Same as [`Birthday::new`] with an explicit reference date.
    pub fn new_relative_to(date: NaiveDate, today: NaiveDate) -> Result<Self, ValidationError> {
        if date >= today {
            return Err(ValidationError::BirthdayNotInPast(date));
        }
        Ok(Self(date))
    }

    /// Parses `DD-MM-YYYY` input.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = non_blank(value, "birthday")?;
        let date = NaiveDate::parse_from_str(trimmed, BIRTHDAY_FORMAT)
            .map_err(|_| ValidationError::InvalidBirthday(trimmed.to_string()))?;
        Self::new(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Localized `DD-MM-YYYY` rendering.
    pub fn local_str(&self) -> String {
        self.0.format(BIRTHDAY_FORMAT).to_string()
    }

    /// Days from the local date until the next occurrence of this birthday.
    ///
    /// Recomputed on every call. Returns `0` when the birthday is today.
    pub fn days_to_birthday(&self) -> u32 {
        self.days_to_birthday_from(local_today())
    }

    /// Days from `today` until the next occurrence of this birthday.
    ///
    /// An occurrence earlier than `today` rolls over to next year. Feb 29
    /// falls on Mar 1 in non-leap years.
    pub fn days_to_birthday_from(&self, today: NaiveDate) -> u32 {
        let mut next = anniversary_in(self.0, today.year());
        if next < today {
            next = anniversary_in(self.0, today.year() + 1);
        }
        u32::try_from((next - today).num_days()).unwrap_or(0)
    }
}

fn anniversary_in(date: NaiveDate, year: i32) -> NaiveDate {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

impl FromStr for Birthday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Birthday {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.local_str()
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::{anniversary_in, is_ascii_digits, Birthday};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn digit_check_rejects_non_ascii_digits() {
        assert!(is_ascii_digits("12345", 5));
        assert!(!is_ascii_digits("1234٥", 5));
        assert!(!is_ascii_digits("1234", 5));
    }

    #[test]
    fn leap_day_falls_on_march_first_in_common_years() {
        assert_eq!(anniversary_in(date(2000, 2, 29), 2027), date(2027, 3, 1));
        assert_eq!(anniversary_in(date(2000, 2, 29), 2028), date(2028, 2, 29));
    }

    #[test]
    fn days_to_birthday_rolls_past_occurrence_to_next_year() {
        let today = date(2026, 10, 19);
        let birthday = Birthday::new_relative_to(date(1990, 10, 18), today).unwrap();
        assert_eq!(birthday.days_to_birthday_from(today), 364);
    }

    #[test]
    fn days_to_birthday_is_zero_on_the_day() {
        let today = date(2026, 10, 19);
        let birthday = Birthday::new_relative_to(date(1990, 10, 19), today).unwrap();
        assert_eq!(birthday.days_to_birthday_from(today), 0);
    }
}
