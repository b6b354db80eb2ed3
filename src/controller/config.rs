//! The persisted configuration: per-backend settings and package-index
//! blobs, stored opaquely so each backend owns its own schema. Entries for
//! backends that are not registered in this run round-trip untouched.

use crate::error::{PakkError, Result};
use crate::project_identity;
use crate::ui;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Per-backend settings blobs, keyed by backend name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, Value>,
    /// Per-backend package-index blobs, keyed by backend name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, Value>,
    /// Where to save on close. Not serialized.
    #[serde(skip)]
    file: PathBuf,
}

impl Configuration {
    /// Load the configuration from `path`. A missing file is not an error:
    /// the default configuration is returned with the path remembered so a
    /// later save creates the file. A malformed file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let mut cfg: Configuration = if contents.trim().is_empty() {
                    Configuration::default()
                } else {
                    serde_yml::from_str(&contents).map_err(|e| {
                        PakkError::ConfigError(format!(
                            "could not parse {}: {}",
                            path.display(),
                            e
                        ))
                    })?
                };
                cfg.file = path.to_path_buf();
                ui::debug(&format!("loaded config from {}", path.display()));
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ui::debug(&format!(
                    "no config file at {}, starting empty",
                    path.display()
                ));
                Ok(Self {
                    file: path.to_path_buf(),
                    ..Default::default()
                })
            }
            Err(e) => Err(PakkError::IoError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Write the full configuration back, atomically: serialize to a temp
    /// file in the same directory, sync, then rename over the target so a
    /// partial write never corrupts a previously-valid file.
    pub fn save(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            return Err(PakkError::ConfigError(
                "no config file location set".to_string(),
            ));
        }

        let dir = self.file.parent().ok_or_else(|| {
            PakkError::ConfigError(format!(
                "invalid config path (no parent directory): {}",
                self.file.display()
            ))
        })?;
        fs::create_dir_all(dir).map_err(|e| PakkError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let content = serde_yml::to_string(self)?;

        let tmp_path = dir.join(format!(
            ".{}.tmp",
            self.file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| project_identity::CONFIG_FILE_BASENAME.to_string())
        ));
        let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| PakkError::IoError {
            path: tmp_path.clone(),
            source: e,
        })?;
        tmp_file
            .write_all(content.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| PakkError::IoError {
                path: tmp_path.clone(),
                source: e,
            })?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.file).map_err(|e| PakkError::IoError {
            path: self.file.clone(),
            source: e,
        })?;
        ui::debug(&format!("saved config to {}", self.file.display()));
        Ok(())
    }
}

/// Advisory lock next to the config file, held for the process lifetime so
/// two invocations cannot interleave their load/save cycles.
pub struct ConfigLock {
    _file: fs::File,
    path: PathBuf,
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl ConfigLock {
    pub fn acquire(config_path: &Path) -> Result<ConfigLock> {
        let lock_path = config_path.with_extension("lock");
        if let Some(dir) = lock_path.parent() {
            fs::create_dir_all(dir).map_err(|e| PakkError::IoError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| PakkError::IoError {
                path: lock_path.clone(),
                source: e,
            })?;

        file.try_lock_exclusive().map_err(|_| {
            PakkError::LockError(format!(
                "another {} process is currently running (lock file: {})",
                project_identity::BINARY_NAME,
                lock_path.display()
            ))
        })?;

        Ok(ConfigLock {
            _file: file,
            path: lock_path,
        })
    }
}

#[cfg(test)]
mod tests;
