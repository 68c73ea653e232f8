//! Infrastructure layer: configuration paths, secret storage, and
//! session persistence.

pub mod json_dir_session_repository;
pub mod memory_session_repository;
pub mod paths;
pub mod secret_storage;

pub use json_dir_session_repository::JsonDirSessionRepository;
pub use memory_session_repository::MemorySessionRepository;
pub use paths::GapscanPaths;
pub use secret_storage::{SecretStorage, SecretStorageError};
