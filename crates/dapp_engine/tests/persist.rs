use std::fs;

use dapp_engine::{ensure_dir, write_atomically};
use tempfile::TempDir;

#[test]
fn creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("state").join("dapps.ron");
    write_atomically(&target, "[]").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
}

#[test]
fn replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("dapps.ron");

    write_atomically(&target, "first").unwrap();
    write_atomically(&target, "second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second");

    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn file_in_place_of_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    assert!(ensure_dir(&blocker).is_err());
    assert!(write_atomically(&blocker.join("dapps.ron"), "data").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
