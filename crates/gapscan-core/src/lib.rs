//! Domain layer for Gapscan.
//!
//! Contains the session model and step machine types, the input
//! validator, the prompt sum type with its conversation-surface trait,
//! the shared error taxonomy, and configuration constants. Collaborator
//! implementations (completion API, document extraction, persistence)
//! live in the sibling crates.

pub mod config;
pub mod error;
pub mod prompt;
pub mod session;
pub mod validate;

// Re-export common error types
pub use error::{AnalysisError, CompletionError, ExtractionError, ValidationError};
