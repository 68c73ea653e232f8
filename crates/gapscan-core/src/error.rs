//! Error types for the Gapscan application.
//!
//! Each failure domain gets its own enum so the turn processor can
//! decide recovery per domain: validation errors are rendered back to
//! the user, extraction errors are skipped per file, completion errors
//! split into transient (retried) and terminal (surfaced immediately).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures, always user-correctable.
///
/// The display texts double as the user-facing messages on the error
/// prompt, so they stay in instructional voice.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Document A is required. Please provide the source/current document.")]
    DocumentARequired,

    #[error("Document B is required. Please provide the target/ideal/guardrails document.")]
    DocumentBRequired,

    #[error("Analysis objective is required. Please describe what to analyze for.")]
    ObjectiveRequired,

    #[error("Document A seems too short. Please provide a complete document.")]
    DocumentATooShort,

    #[error("Document B seems too short. Please provide a complete document.")]
    DocumentBTooShort,

    #[error("Analysis objective is too short. Please provide a meaningful objective.")]
    ObjectiveTooShort,

    #[error("Input too long ({0} chars). Please shorten to under 21,000 characters total.")]
    InputTooLongChars(usize),

    #[error("Input too long ({0} tokens). Please shorten the documents to fit the analysis budget.")]
    InputTooLongTokens(usize),
}

/// Per-file extraction failures.
///
/// These never fail a whole upload batch on their own; the batch errors
/// only when every file in it fails.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionError {
    #[error("Unsupported file type: {filename}. Supported: PDF, Word (.docx), Text (.txt)")]
    UnsupportedType { filename: String },

    #[error("File too large ({size_bytes} bytes). Maximum size is 10 MB.")]
    FileTooLarge { size_bytes: usize },

    #[error("Failed to download file: {0}")]
    Download(String),

    #[error("Failed to extract text: {0}")]
    Parse(String),
}

/// Completion API failures, classified for the retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionError {
    #[error("Completion API rate limited: {message}")]
    RateLimited { message: String },

    #[error("Completion API server error (status {status:?}): {message}")]
    ServerError {
        status: Option<u16>,
        message: String,
    },

    #[error("Empty response from completion API")]
    EmptyResponse,

    #[error("Completion API not configured: {0}")]
    Config(String),

    #[error("Completion API rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Completion API error: {0}")]
    Other(String),
}

impl CompletionError {
    /// Whether a retry is expected to succeed.
    ///
    /// Only rate limiting and server-side errors qualify; auth/config
    /// problems, malformed requests and empty results fail immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ServerError { .. }
        )
    }
}

/// Failures surfaced by the gap-analysis orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Analysis failed: {0}")]
    Completion(#[from] CompletionError),
}
