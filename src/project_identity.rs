//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.
//! Keep `STABLE_PROJECT_ID` stable across rename transitions.

pub const DISPLAY_NAME: &str = "Pakk";
pub const BINARY_NAME: &str = "pakk";
pub const STABLE_PROJECT_ID: &str = "pakk";
pub const CONFIG_DIR_NAME: &str = "pakk";
pub const ENV_PREFIX: &str = "PAKK";
pub const REPO_SLUG: &str = "nixval/pakk";
pub const CONFIG_FILE_BASENAME: &str = "pakk.yml";

/// Module path the goget backend seeds a fresh index with.
pub const BOOTSTRAP_PACKAGE_URL: &str = "github.com/nixval/pakk";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}
