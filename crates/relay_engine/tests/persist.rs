use std::fs;

use relay_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("export.csv", "one").unwrap();
    assert_eq!(first.file_name().unwrap(), "export.csv");
    assert_eq!(fs::read_to_string(&first).unwrap(), "one");

    let second = writer.write("export.csv", "two").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "two");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("export.csv", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("export.csv").exists());
}
