//! Secret storage.
//!
//! Reads API credentials from secret.json. Missing file is not an
//! error at construction time; callers decide whether an absent
//! completion section is fatal.

use std::path::{Path, PathBuf};

use gapscan_core::config::SecretConfig;

use crate::paths::GapscanPaths;

/// Errors that can occur when reading secret configuration.
#[derive(Debug)]
pub enum SecretStorageError {
    /// The secret file path could not be resolved.
    PathUnresolved,
    /// Reading the file failed.
    Io(std::io::Error),
    /// The file contents were not valid JSON for SecretConfig.
    Malformed(serde_json::Error),
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::PathUnresolved => {
                write!(f, "Cannot resolve secret.json path")
            }
            SecretStorageError::Io(err) => write!(f, "Failed to read secret.json: {err}"),
            SecretStorageError::Malformed(err) => {
                write!(f, "secret.json is not valid: {err}")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

/// Reads SecretConfig from a JSON file on disk.
#[derive(Clone)]
pub struct SecretStorage {
    file_path: PathBuf,
}

impl SecretStorage {
    /// Creates storage pointed at the default location
    /// (`~/.config/gapscan/secret.json`).
    pub fn new() -> Result<Self, SecretStorageError> {
        let file_path =
            GapscanPaths::secret_file().map_err(|_| SecretStorageError::PathUnresolved)?;
        Ok(Self { file_path })
    }

    /// Creates storage pointed at an explicit file.
    pub fn with_path(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Whether the secret file exists on disk.
    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Loads the secret configuration.
    ///
    /// A missing file yields the default (empty) configuration so that
    /// environment-variable fallback can take over.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        let contents = match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SecretConfig::default());
            }
            Err(err) => return Err(SecretStorageError::Io(err)),
        };
        serde_json::from_str(&contents).map_err(SecretStorageError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SecretStorage::with_path(dir.path().join("secret.json"));
        assert!(!storage.exists());
        let config = storage.load().unwrap();
        assert!(config.completion.is_none());
    }

    #[test]
    fn completion_section_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"completion": {{"endpoint": "https://example.openai.azure.com", "api_key": "k", "deployment": "gpt-4o-mini"}}}}"#
        )
        .unwrap();

        let storage = SecretStorage::with_path(file.path());
        let config = storage.load().unwrap();
        let completion = config.completion.expect("completion section");
        assert_eq!(completion.endpoint, "https://example.openai.azure.com");
        assert_eq!(completion.deployment.as_deref(), Some("gpt-4o-mini"));
        assert!(completion.api_version.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let storage = SecretStorage::with_path(file.path());
        assert!(matches!(
            storage.load(),
            Err(SecretStorageError::Malformed(_))
        ));
    }
}
