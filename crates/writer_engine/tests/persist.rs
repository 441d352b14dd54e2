use std::fs;

use writer_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_nested_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("output").join("wechat");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn file_in_place_of_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(matches!(
        ensure_output_dir(&file_path),
        Err(PersistError::NotADirectory(_))
    ));
}

#[test]
fn rewriting_an_article_replaces_previous_output() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("post_wechat.html", "<p>v1</p>").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "<p>v1</p>");

    let second = writer.write("post_wechat.html", "<p>v2</p>").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "<p>v2</p>");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("post.html", "data").is_err());
    assert!(!file_path.with_file_name("post.html").exists());
}
