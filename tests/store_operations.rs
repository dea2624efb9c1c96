//! Store Operation Tests
//!
//! Covers:
//! - Insert / Find round trip through the JSON file layout
//! - ReplaceInto inserting then updating
//! - Update and Delete visibility
//! - Load failure policy for corrupt tables
//! - Serialized writers under concurrency

use jsondb::{field, DbError, Field, Record, Store, StoreConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct User {
    id: i64,
    name: String,
}

impl User {
    fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key() -> &'static str {
        "id"
    }

    fn fields() -> Vec<Field<Self>> {
        vec![field!(User, id: Int), field!(User, name: Str)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Location {
    city: String,
    zip: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Profile {
    key: u64,
    display: String,
    score: f64,
    tags: Vec<String>,
    location: Location,
    cached: bool,
}

impl Record for Profile {
    fn table_name() -> &'static str {
        "profiles"
    }

    fn primary_key() -> &'static str {
        "profile_id"
    }

    fn fields() -> Vec<Field<Self>> {
        vec![
            field!(Profile, key: UInt, "profile_id"),
            field!(Profile, display: Str, "display,omitempty"),
            field!(Profile, score: Float),
            field!(Profile, tags: Seq),
            field!(Profile, location: Nested),
            field!(Profile, cached: Bool, "-"),
        ]
    }
}

fn open_store(temp_dir: &TempDir) -> Store {
    Store::open_dir(temp_dir.path().join("db")).expect("Failed to open store")
}

fn read_table(temp_dir: &TempDir, table: &str) -> JsonValue {
    let raw = fs::read_to_string(temp_dir.path().join("db").join(format!("{}.json", table)))
        .expect("Failed to read table file");
    serde_json::from_str(&raw).unwrap()
}

fn find_user(store: &Store, id: i64) -> Result<User, DbError> {
    let mut user = User {
        id,
        ..Default::default()
    };
    store.find(&mut user).map(|_| user)
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_users_walkthrough() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    store.insert(&User::new(1, "Hello")).unwrap();
    store.replace_into(&User::new(2, "Test")).unwrap();
    assert_eq!(find_user(&store, 2).unwrap(), User::new(2, "Test"));

    store.replace_into(&User::new(2, "Updated")).unwrap();
    assert_eq!(
        read_table(&temp_dir, "users"),
        json!([{"id": 1, "name": "Hello"}, {"id": 2, "name": "Updated"}])
    );

    store.delete(&User::new(1, "")).unwrap();
    assert!(matches!(find_user(&store, 1), Err(DbError::RecordNotFound)));
    assert_eq!(find_user(&store, 2).unwrap().name, "Updated");
}

#[test]
fn test_round_trip_uses_external_names() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    let profile = Profile {
        key: 42,
        display: "Ada".into(),
        score: 9.5,
        tags: vec!["admin".into(), "ops".into()],
        location: Location {
            city: "London".into(),
            zip: "N1".into(),
        },
        cached: true,
    };
    store.insert(&profile).unwrap();

    let stored = read_table(&temp_dir, "profiles");
    assert_eq!(stored[0]["profile_id"], 42);
    assert_eq!(stored[0]["display"], "Ada");
    assert_eq!(stored[0]["location"]["city"], "London");
    assert!(stored[0].get("cached").is_none());
    assert!(stored[0].get("key").is_none());

    let mut found = Profile {
        key: 42,
        ..Default::default()
    };
    store.find(&mut found).unwrap();
    assert_eq!(
        found,
        Profile {
            cached: false,
            ..profile
        }
    );
}

#[test]
fn test_find_keeps_fields_absent_from_document() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    fs::write(
        temp_dir.path().join("db").join("users.json"),
        r#"[{"id": 5}]"#,
    )
    .unwrap();

    let mut user = User::new(5, "kept");
    store.find(&mut user).unwrap();
    assert_eq!(user.name, "kept");
}

// =============================================================================
// Update / Delete
// =============================================================================

#[test]
fn test_update_then_find() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.insert(&User::new(1, "before")).unwrap();

    store.update(&User::new(1, "after")).unwrap();
    assert_eq!(find_user(&store, 1).unwrap().name, "after");
}

#[test]
fn test_update_missing_record_fails() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.insert(&User::new(1, "a")).unwrap();

    assert!(matches!(
        store.update(&User::new(9, "x")),
        Err(DbError::RecordNotFound)
    ));
    assert_eq!(read_table(&temp_dir, "users"), json!([{"id": 1, "name": "a"}]));
}

#[test]
fn test_duplicate_keys_resolve_to_first() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.insert(&User::new(1, "first")).unwrap();
    store.insert(&User::new(1, "second")).unwrap();

    assert_eq!(find_user(&store, 1).unwrap().name, "first");

    store.delete(&User::new(1, "")).unwrap();
    assert_eq!(find_user(&store, 1).unwrap().name, "second");
}

#[test]
fn test_delete_last_record_removes_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.insert(&User::new(1, "only")).unwrap();

    store.delete(&User::new(1, "")).unwrap();
    assert!(!temp_dir.path().join("db").join("users.json").exists());
    assert!(store.tables().unwrap().is_empty());

    store.insert(&User::new(2, "again")).unwrap();
    assert_eq!(find_user(&store, 2).unwrap().name, "again");
}

// =============================================================================
// Load Failures
// =============================================================================

#[test]
fn test_corrupt_table_is_not_overwritten_by_insert() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    let path = temp_dir.path().join("db").join("users.json");
    fs::write(&path, "[{\"id\": 1,").unwrap();

    let err = store.insert(&User::new(2, "b")).unwrap_err();
    assert!(matches!(err, DbError::Serialization(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\": 1,");

    assert!(matches!(find_user(&store, 1), Err(DbError::RecordNotFound)));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_open_with_atomic_pretty_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = StoreConfig::new(temp_dir.path().join("db"));
    config.atomic_flush = true;
    config.pretty = true;
    let store = Store::open(&config).unwrap();

    store.insert(&User::new(1, "a")).unwrap();
    store.replace_into(&User::new(1, "b")).unwrap();

    let raw = fs::read_to_string(temp_dir.path().join("db").join("users.json")).unwrap();
    assert!(raw.contains("\n  "));
    assert!(!temp_dir.path().join("db").join("users.json.tmp").exists());
    assert_eq!(find_user(&store, 1).unwrap().name, "b");
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_inserts_are_serialized() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&temp_dir));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..5 {
                    store.insert(&User::new(i * 10 + j, "worker")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.query::<User>().unwrap().count().unwrap(), 40);
    assert_eq!(store.metrics().inserts, 40);
}
