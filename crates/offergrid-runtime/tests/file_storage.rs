#![forbid(unsafe_code)]

//! JSON-file backend behavior.
//!
//! Run:
//!   cargo test -p offergrid-runtime --features file-storage --test file_storage

use offergrid_layout::SlotId;
use offergrid_runtime::{
    AssignmentStore, FileStorage, GridConfig, LoadSource, StorageBackend, StorageError,
};
use pretty_assertions::assert_eq;

const KEY: &str = "offers-grid-layout";

#[test]
fn missing_file_loads_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path().join("state.json"));
    assert_eq!(storage.load(KEY).expect("load"), None);
}

#[test]
fn save_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("state.json");
    let mut storage = FileStorage::new(&path);
    storage.save(KEY, "[1,0]").expect("save");
    storage.save("other", "x").expect("save");
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
    assert_eq!(storage.load(KEY).expect("load").as_deref(), Some("[1,0]"));
    assert_eq!(storage.load("other").expect("load").as_deref(), Some("x"));
}

#[test]
fn remove_keeps_other_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut storage = FileStorage::new(dir.path().join("state.json"));
    storage.save("a", "1").expect("save");
    storage.save("b", "2").expect("save");
    storage.remove("a").expect("remove");
    assert_eq!(storage.load("a").expect("load"), None);
    assert_eq!(storage.load("b").expect("load").as_deref(), Some("2"));
}

#[test]
fn corrupt_file_is_a_serialization_error_then_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").expect("write");
    let mut storage = FileStorage::new(&path);
    assert!(matches!(
        storage.load(KEY),
        Err(StorageError::Serialization(_))
    ));
    storage.save(KEY, "[0]").expect("save replaces corrupt file");
    assert_eq!(storage.load(KEY).expect("load").as_deref(), Some("[0]"));
}

#[test]
fn store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");

    let mut store = AssignmentStore::load(FileStorage::new(&path), KEY, 7);
    assert_eq!(store.source(), &LoadSource::Missing);
    store.swap(SlotId::new(0), SlotId::new(2));

    let reloaded = AssignmentStore::load(FileStorage::new(&path), KEY, 7);
    assert_eq!(reloaded.source(), &LoadSource::Persisted);
    assert_eq!(reloaded.assignment().as_slice(), &[2, 1, 0, 3, 4, 5, 6]);
}

#[test]
fn configured_storage_path_backs_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("layout.json");
    let config = GridConfig::from_json_str(&format!(
        r#"{{"storage_path": {}}}"#,
        serde_json::to_string(&path).expect("path to json")
    ))
    .expect("parses");

    let mut store =
        AssignmentStore::load(config.file_storage().expect("path set"), KEY, 7);
    store.swap(SlotId::new(5), SlotId::new(6));

    let saved = FileStorage::new(&path).load(KEY).expect("load");
    assert_eq!(saved.as_deref(), Some("[0,1,2,3,4,6,5]"));
}
