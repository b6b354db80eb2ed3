use super::*;
use serde_json::json;

#[test]
fn absent_file_loads_as_default_and_remembers_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");

    let cfg = Configuration::load(&path).unwrap();
    assert!(cfg.settings.is_empty());
    assert!(cfg.packages.is_empty());
    assert_eq!(cfg.file(), path);

    // a later save creates the file at that same location
    cfg.save().unwrap();
    assert!(path.exists());
}

#[test]
fn empty_file_loads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");
    std::fs::write(&path, "\n").unwrap();

    let cfg = Configuration::load(&path).unwrap();
    assert!(cfg.packages.is_empty());
}

#[test]
fn malformed_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");
    std::fs::write(&path, "packages: [not: closed").unwrap();

    assert!(Configuration::load(&path).is_err());
}

#[test]
fn unknown_backends_round_trip_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");

    let mut cfg = Configuration::load(&path).unwrap();
    cfg.settings
        .insert("exotic".to_string(), json!({"nested": {"key": 5}}));
    cfg.packages.insert(
        "exotic".to_string(),
        json!([{"anything": "goes", "here": [1, 2, 3]}]),
    );
    cfg.packages
        .insert("goget".to_string(), json!([{"url": "github.com/a/b"}]));
    cfg.save().unwrap();

    let reloaded = Configuration::load(&path).unwrap();
    assert_eq!(reloaded.settings["exotic"], json!({"nested": {"key": 5}}));
    assert_eq!(
        reloaded.packages["exotic"],
        json!([{"anything": "goes", "here": [1, 2, 3]}])
    );
    assert_eq!(reloaded.packages.len(), 2);
}

#[test]
fn save_load_save_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");

    let mut cfg = Configuration::load(&path).unwrap();
    cfg.packages
        .insert("goget".to_string(), json!([{"url": "github.com/a/b", "version": "latest"}]));
    cfg.save().unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let reloaded = Configuration::load(&path).unwrap();
    reloaded.save().unwrap();
    let second = std::fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn save_replaces_rather_than_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");
    std::fs::write(&path, "packages:\n  old: [1, 2, 3]\n").unwrap();

    let mut cfg = Configuration::load(&path).unwrap();
    cfg.packages.remove("old");
    cfg.packages.insert("new".to_string(), json!([]));
    cfg.save().unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("old"));
    // no leftover temp file
    assert_eq!(
        std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .count(),
        1
    );
}

#[test]
fn default_configuration_has_no_save_location() {
    assert!(Configuration::default().save().is_err());
}

#[test]
fn config_lock_excludes_second_holder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pakk.yml");

    let lock = ConfigLock::acquire(&path).unwrap();
    assert!(ConfigLock::acquire(&path).is_err());

    drop(lock);
    assert!(ConfigLock::acquire(&path).is_ok());
}
