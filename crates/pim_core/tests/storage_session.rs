use pim_core::{
    Birthday, ContactRepository, DataProvider, JsonFileProvider, NoteRepository, Phone,
    PimConfig, PimSession, ProviderKind, Record, SqliteProvider, StorageError,
};
use std::fs;

fn sample_contacts() -> ContactRepository {
    let mut repo = ContactRepository::new();
    let mut vasyl = Record::new("Vasyl Petrenko").unwrap();
    vasyl.add_phone(Phone::parse("0501234567").unwrap());
    vasyl.set_birthday(Birthday::parse("13-01-1930").unwrap());
    repo.add(vasyl).unwrap();
    let olena = repo.add(Record::new("Olena").unwrap()).unwrap();
    let olena = repo.get(olena).cloned().unwrap();
    repo.delete(&olena).unwrap();
    repo
}

fn sample_notes() -> NoteRepository {
    let mut repo = NoteRepository::new();
    let note = repo.new_note("learn #rust", ["study"]).unwrap();
    repo.add(note).unwrap();
    repo
}

#[test]
fn json_provider_round_trips_contacts_and_counters() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonFileProvider::new(dir.path().join("data").join("contacts.json"));

    let missing: Option<ContactRepository> = provider.read().unwrap();
    assert!(missing.is_none());

    let contacts = sample_contacts();
    provider.write(&contacts).unwrap();
    assert!(!dir.path().join("data").join("contacts.json.tmp").exists());

    let mut loaded: ContactRepository = provider.read().unwrap().unwrap();
    assert_eq!(loaded, contacts);
    assert_eq!(loaded.last_id(), 2);

    let next = loaded.add(Record::new("Olena").unwrap()).unwrap();
    assert_eq!(next, 3);
}

#[test]
fn json_provider_reports_corrupt_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, "{ not json").unwrap();

    let provider = JsonFileProvider::new(&path);
    let err = DataProvider::<NoteRepository>::read(&provider).unwrap_err();
    assert!(matches!(err, StorageError::Serde(_)), "{err}");
}

#[test]
fn sqlite_provider_keeps_repositories_under_separate_keys() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pim.sqlite3");
    let contacts_provider = SqliteProvider::new(&db_path, "contacts");
    let notes_provider = SqliteProvider::new(&db_path, "notes");

    let nothing: Option<NoteRepository> = notes_provider.read().unwrap();
    assert!(nothing.is_none());

    let contacts = sample_contacts();
    let notes = sample_notes();
    contacts_provider.write(&contacts).unwrap();
    notes_provider.write(&notes).unwrap();
    notes_provider.write(&notes).unwrap();

    let loaded_contacts: ContactRepository = contacts_provider.read().unwrap().unwrap();
    let loaded_notes: NoteRepository = notes_provider.read().unwrap().unwrap();
    assert_eq!(loaded_contacts, contacts);
    assert_eq!(loaded_notes, notes);
    assert_eq!(loaded_notes.tag_pool()["rust"], vec![1]);
    assert_eq!(loaded_notes.tag_pool()["study"], vec![1]);
    assert_eq!(
        DataProvider::<NoteRepository>::location(&notes_provider),
        format!("{}#notes", db_path.display())
    );
}

#[test]
fn session_saves_and_reloads_through_configured_providers() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pim.toml");
    fs::write(
        &config_path,
        r#"
[contacts]
provider = "file:json"
connection = "contacts.json"

[notes]
provider = "sqlite"
connection = "store/pim.sqlite3"
"#,
    )
    .unwrap();

    let config = PimConfig::load(&config_path).unwrap();
    assert_eq!(config.contacts.provider, ProviderKind::JsonFile);
    assert_eq!(config.notes.connection, dir.path().join("store/pim.sqlite3"));

    let mut session = PimSession::open(&config).unwrap();
    assert!(session.contacts.is_empty());
    assert!(session.notes.is_empty());

    session.contacts.add(Record::new("Ann").unwrap()).unwrap();
    let note = session.notes.new_note("call #Ann", Vec::<&str>::new()).unwrap();
    let note_id = session.notes.add(note).unwrap();
    session.save().unwrap();
    drop(session);

    let reopened = PimSession::open(&config).unwrap();
    assert_eq!(reopened.contacts.get_by_name("Ann").unwrap().id, 1);
    assert_eq!(reopened.notes.get(note_id).unwrap().content, "call Ann");
    assert_eq!(reopened.notes.find_by_tags(&["ann"]).len(), 1);
    assert!(dir.path().join("contacts.json").exists());
}

#[test]
fn session_accepts_explicit_providers() {
    let dir = tempfile::tempdir().unwrap();
    let contacts_path = dir.path().join("contacts.json");
    JsonFileProvider::new(&contacts_path)
        .write(&sample_contacts())
        .unwrap();

    let session = PimSession::with_providers(
        Box::new(JsonFileProvider::new(&contacts_path)),
        Box::new(JsonFileProvider::new(dir.path().join("notes.json"))),
    )
    .unwrap();
    assert_eq!(session.contacts.len(), 1);
    assert!(session.notes.is_empty());
}
