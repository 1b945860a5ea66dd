use pinmap_core::db::migrations::latest_version;
use pinmap_core::db::open_db_in_memory;
use pinmap_core::{
    Pin, PinKind, PinRepository, PinValidationError, RepoError, SqlitePinRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn location_pin(name: &str) -> Pin {
    let mut pin = Pin::new(PinKind::Location);
    pin.set_icon_id(3);
    pin.set_name(Some(name));
    pin.set_address("12 Elm St, Springfield, IL, 62704");
    pin.set_coordinates(Some("39.79, -89.65"));
    pin.set_content(Some("drop-off point"));
    pin
}

#[test]
fn insert_and_get_roundtrip_preserves_sanitized_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let mut pin = Pin::new(PinKind::Location);
    pin.set_icon_id(2);
    pin.set_name(Some("<b>Recycling</b> o'clock"));
    pin.set_address("12 Elm St, Springfield, IL, 62704");
    pin.set_coordinates(Some("39.79, -89.65"));
    pin.set_content(Some("bring <i>clean</i> cans"));
    pin.set_thumbnail(Some("site.png"));
    pin.set_link(Some("example.org"));

    let id = repo.insert(&pin).unwrap();
    let loaded = repo.get(id).unwrap().unwrap();

    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.kind(), PinKind::Generic);
    assert_eq!(loaded.record().icon_id, 2);
    assert_eq!(loaded.record().name, "Recycling o\\'clock");
    assert_eq!(loaded.record().street, "12 Elm St");
    assert_eq!(loaded.record().town, "Springfield");
    assert_eq!(loaded.record().state, "IL");
    assert_eq!(loaded.record().zip, "62704");
    assert_eq!(loaded.record().coordinates, "39.79, -89.65");
    assert_eq!(loaded.record().content, "bring clean cans");
    assert_eq!(loaded.record().thumbnail, "site.png");
    assert_eq!(loaded.record().link, "example.org");
    assert!(!loaded.record().api_sourced);
    assert_eq!(loaded.location_address(), "12 Elm St, Springfield, IL 62704");
}

#[test]
fn insert_assigns_fresh_distinct_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let first = repo.insert(&location_pin("a")).unwrap();
    let second = repo.insert(&location_pin("b")).unwrap();

    assert_ne!(first, second);
}

#[test]
fn update_overwrites_every_mapped_field() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let id = repo.insert(&location_pin("before")).unwrap();
    let mut pin = repo.load(id).unwrap();
    pin.set_name(Some("after"));
    pin.set_icon_id(5);
    pin.set_start_date(Some("2026-09-01 09:00"));
    pin.set_end_date(Some("2026-09-01 17:00"));
    pin.set_api_sourced(true);
    repo.update(&pin).unwrap();

    let loaded = repo.load(id).unwrap();
    assert_eq!(loaded.record().name, "after");
    assert_eq!(loaded.record().icon_id, 5);
    assert_eq!(loaded.record().start_date.as_deref(), Some("2026-09-01 09:00"));
    assert_eq!(loaded.record().end_date.as_deref(), Some("2026-09-01 17:00"));
    assert!(loaded.record().api_sourced);
}

#[test]
fn update_of_missing_id_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let mut pin = location_pin("ghost");
    pin.record_mut().id = Some(4242);

    let err = repo.update(&pin).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(4242)));
}

#[test]
fn id_keyed_operations_require_an_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let pin = location_pin("no identity yet");
    assert!(matches!(repo.update(&pin), Err(RepoError::MissingId)));
    assert!(matches!(repo.delete(&pin), Err(RepoError::MissingId)));
}

#[test]
fn delete_removes_the_row_for_good() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let id = repo.insert(&location_pin("temporary")).unwrap();
    let pin = repo.load(id).unwrap();

    repo.delete(&pin).unwrap();

    assert!(repo.get(id).unwrap().is_none());
    assert!(matches!(repo.load(id), Err(RepoError::NotFound(found)) if found == id));
    assert!(matches!(repo.delete(&pin), Err(RepoError::NotFound(_))));
}

#[test]
fn get_permits_absence_while_load_does_not() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    assert!(repo.get(999).unwrap().is_none());
    assert!(matches!(repo.load(999), Err(RepoError::NotFound(999))));
}

#[test]
fn all_returns_the_same_set_regardless_of_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let mut expected = HashSet::new();
    for name in ["a", "b", "c"] {
        expected.insert(repo.insert(&location_pin(name)).unwrap());
    }

    let actual: HashSet<_> = repo
        .all()
        .unwrap()
        .into_iter()
        .filter_map(|pin| pin.id())
        .collect();

    assert_eq!(actual, expected);
}

#[test]
fn count_reflects_total_rows_independent_of_filters() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    assert_eq!(repo.count().unwrap(), 0);

    repo.insert(&location_pin("a")).unwrap();
    let mut event = Pin::new(PinKind::Event);
    event.set_start_date(Some("2026-09-01 09:00"));
    event.set_end_date(Some("2026-09-01 17:00"));
    repo.insert(&event).unwrap();

    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn half_open_date_range_is_rejected_on_write_paths() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    let mut invalid = Pin::new(PinKind::Generic);
    invalid.set_start_date(Some("2026-09-01 09:00"));

    let create_err = repo.insert(&invalid).unwrap_err();
    assert!(matches!(create_err, RepoError::Validation(_)));

    let id = repo.insert(&location_pin("valid")).unwrap();
    let mut stored = repo.load(id).unwrap();
    stored.set_end_date(Some("2026-09-02 17:00"));
    let update_err = repo.update(&stored).unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
}

#[test]
fn read_paths_reject_invalid_persisted_api_flag() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO locations (iconid, name, api) VALUES (1, 'bad flag', 2);",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    let repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    assert!(matches!(repo.get(id), Err(RepoError::InvalidData(_))));
    assert!(matches!(repo.all(), Err(RepoError::InvalidData(_))));
}

#[test]
fn read_paths_reject_half_open_persisted_date_range() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO locations (iconid, name, dateStart) VALUES (1, 'half open', '2026-09-01 09:00');",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    let repo = SqlitePinRepository::try_new(&mut conn).unwrap();

    assert!(matches!(
        repo.get(id),
        Err(RepoError::Validation(PinValidationError::HalfOpenDateRange))
    ));
    assert!(matches!(
        repo.all(),
        Err(RepoError::Validation(PinValidationError::HalfOpenDateRange))
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqlitePinRepository::try_new(&mut conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_locations_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePinRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("locations"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_locations_column() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            iconid INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL DEFAULT ''
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePinRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "locations",
            column: "street"
        })
    ));
}
