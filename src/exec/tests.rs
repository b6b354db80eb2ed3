use super::*;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_argv_is_rejected() {
    let err = SystemRunner.run(&[], &ExecOptions::default());
    assert!(err.is_err());
}

#[test]
fn captures_stdout() {
    let out = SystemRunner
        .run(&argv(&["echo", "hello"]), &ExecOptions::default())
        .unwrap();
    assert_eq!(out.trim(), "hello");
}

#[test]
fn nonzero_exit_maps_to_command_failed_with_output() {
    let err = SystemRunner
        .run(&argv(&["sh", "-c", "echo oops >&2; exit 3"]), &ExecOptions::default())
        .unwrap_err();
    match err {
        PakkError::CommandFailed { command, output, .. } => {
            assert!(command.starts_with("sh"));
            assert!(output.contains("oops"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn working_dir_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ExecOptions {
        working_dir: Some(dir.path().to_path_buf()),
        echo: false,
    };
    let out = SystemRunner.run(&argv(&["pwd"]), &opts).unwrap();
    let reported = std::fs::canonicalize(out.trim()).unwrap();
    let expected = std::fs::canonicalize(dir.path()).unwrap();
    assert_eq!(reported, expected);
}
