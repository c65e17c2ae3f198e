use pim_core::search::query::normalize_for_match;
use pim_core::{
    Address, Birthday, Phone, Record, SearchError, SearchField, SearchQuery, SearchTerm,
};

fn sample_record() -> Record {
    let mut record = Record::new("Vasyl Petrenko").unwrap();
    record.add_phone(Phone::parse("0501234567").unwrap());
    record.add_phone(Phone::parse("0671112233").unwrap());
    record.set_birthday(Birthday::parse("13-01-1930").unwrap());
    record
        .set_address(Address {
            city: Some("Kyiv".to_string()),
            street: Some("Khreshchatyk".to_string()),
            house: Some("22".to_string()),
            ..Address::default()
        })
        .unwrap();
    record
}

#[test]
fn term_parse_reads_field_and_normalizes_pattern() {
    let term = SearchTerm::parse("%phones% 050-123 ").unwrap();
    assert_eq!(term.field, SearchField::Phones);
    assert_eq!(term.pattern, "050123");

    assert_eq!(SearchTerm::parse("%BIRTHDAY%13-01").unwrap().field, SearchField::Birthday);
    assert_eq!(SearchTerm::parse("%Bday%x").unwrap().field.marker(), "BDAY");
}

#[test]
fn term_parse_reports_bad_tokens() {
    assert_eq!(
        SearchTerm::parse("Vasyl").unwrap_err(),
        SearchError::InvalidToken("Vasyl".to_string())
    );
    assert_eq!(
        SearchTerm::parse("%NICK%vasya").unwrap_err(),
        SearchError::UnknownField {
            token: "%NICK%vasya".to_string(),
            field: "NICK".to_string(),
        }
    );
}

#[test]
fn each_field_matches_only_its_own_value() {
    let record = sample_record();

    assert!(SearchTerm::new(SearchField::Name, "petrenko").matches(&record));
    assert!(SearchTerm::new(SearchField::Address, "kyiv khreshchatyk").matches(&record));
    assert!(SearchTerm::new(SearchField::Phones, "067-111").matches(&record));
    assert!(SearchTerm::new(SearchField::Birthday, "13-01").matches(&record));

    assert!(!SearchTerm::new(SearchField::Name, "kyiv").matches(&record));
    assert!(!SearchTerm::new(SearchField::Email, "vasyl").matches(&record));
}

#[test]
fn phone_pattern_does_not_span_two_numbers() {
    let record = sample_record();
    assert!(!SearchTerm::new(SearchField::Phones, "4567067").matches(&record));
}

#[test]
fn query_is_a_disjunction() {
    let record = sample_record();
    let query = SearchQuery::parse(&["%NAME%Olena", "%ADDRESS%Lviv"]).unwrap();
    assert!(!query.matches(&record));

    let query = SearchQuery::parse(&["%NAME%Olena", "%PHONES%0501234567"]).unwrap();
    assert_eq!(query.terms.len(), 2);
    assert!(query.matches(&record));

    let empty = SearchQuery::parse::<&str>(&[]).unwrap();
    assert!(empty.is_empty());
    assert!(!empty.matches(&record));
}

#[test]
fn normalize_for_match_drops_punctuation() {
    assert_eq!(normalize_for_match(" Kyiv, Str.\\ 5-a "), "kyiv str 5a");
}
