use std::fs;

use gacha_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("players").join("1234");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("gacha_logs.json", "{}").unwrap();
    assert_eq!(first.file_name().unwrap(), "gacha_logs.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "{}");

    let second = writer.write("gacha_logs.json", "{\"a\":1}").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "{\"a\":1}");

    // Only the target remains; no temp files are left behind.
    let entries = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("gacha_logs.json", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("gacha_logs.json").exists());
}
