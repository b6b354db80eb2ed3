use super::*;

#[test]
fn expand_home_leaves_absolute_paths_alone() {
    let p = PathBuf::from("/tmp/somewhere");
    assert_eq!(expand_home(&p).unwrap(), p);
}

#[test]
fn expand_home_leaves_relative_paths_alone() {
    let p = PathBuf::from("relative/dir");
    assert_eq!(expand_home(&p).unwrap(), p);
}

#[test]
fn expand_home_replaces_tilde_prefix() {
    let expanded = expand_home(Path::new("~/some/dir")).unwrap();
    assert!(!expanded.to_string_lossy().contains('~'));
    assert!(expanded.ends_with("some/dir"));
}

#[test]
fn config_file_uses_project_basename() {
    let file = config_file().unwrap();
    assert!(file.ends_with(project_identity::CONFIG_FILE_BASENAME));
}
