//! Project root discovery from the working directory

use serial_test::serial;
use std::env;
use std::fs;

use specflow::commands::common::project_root;

#[test]
#[serial]
fn test_discovers_root_from_subdirectory() {
    let temp = tempfile::TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("spec")).unwrap();
    fs::write(root.join("spec/specflow.toml"), "").unwrap();
    let nested = root.join("crates/app/src");
    fs::create_dir_all(&nested).unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(&nested).unwrap();
    let found = project_root(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(found.unwrap(), root);
}

#[test]
#[serial]
fn test_falls_back_to_current_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().canonicalize().unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(&dir).unwrap();
    let found = project_root(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(found.unwrap(), dir);
}
