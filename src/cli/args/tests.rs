use super::{Cli, Command};
use crate::project_identity;
use clap::Parser;

#[test]
fn parser_requires_a_subcommand() {
    let parsed = Cli::try_parse_from([project_identity::BINARY_NAME]);
    assert!(parsed.is_err());
}

#[test]
fn install_parses_backend_and_packages() {
    let parsed = Cli::try_parse_from([
        project_identity::BINARY_NAME,
        "install",
        "goget",
        "github.com/a/b@v1.2.3",
    ])
    .expect("install with backend and package should parse");
    match parsed.command {
        Command::Install { backend, packages } => {
            assert_eq!(backend, "goget");
            assert_eq!(packages, vec!["github.com/a/b@v1.2.3".to_string()]);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn install_allows_empty_package_list() {
    let parsed = Cli::try_parse_from([project_identity::BINARY_NAME, "install", "goget"])
        .expect("install without packages should parse");
    match parsed.command {
        Command::Install { packages, .. } => assert!(packages.is_empty()),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn remove_requires_at_least_one_package() {
    let parsed = Cli::try_parse_from([project_identity::BINARY_NAME, "remove", "goget"]);
    assert!(parsed.is_err());
}

#[test]
fn upgrade_without_backend_means_all() {
    let parsed = Cli::try_parse_from([project_identity::BINARY_NAME, "upgrade"])
        .expect("bare upgrade should parse");
    match parsed.command {
        Command::Upgrade { backend, packages } => {
            assert!(backend.is_none());
            assert!(packages.is_empty());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn global_flags_parse_after_the_subcommand() {
    let parsed = Cli::try_parse_from([
        project_identity::BINARY_NAME,
        "list",
        "--config",
        "/tmp/pakk.yml",
        "-v",
        "-y",
    ])
    .expect("global flags after subcommand should parse");
    assert_eq!(
        parsed.global.config.as_deref(),
        Some(std::path::Path::new("/tmp/pakk.yml"))
    );
    assert!(parsed.global.verbose);
    assert!(parsed.global.yes);
}
