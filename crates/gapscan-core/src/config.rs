//! Configuration constants and secret configuration shapes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum trimmed length for each document.
pub const MIN_DOCUMENT_CHARS: usize = 20;

/// Minimum trimmed length for the analysis objective.
pub const MIN_OBJECTIVE_CHARS: usize = 5;

/// Character ceiling for the combined inputs in paste mode.
pub const MAX_PASTE_CHARS: usize = 21_000;

/// Token ceiling (cl100k_base) for the combined inputs in file mode.
pub const MAX_FILE_TOKENS: usize = 70_000;

/// Maximum number of files accepted for Document B in one session.
pub const MAX_DOC_B_FILES: usize = 10;

/// Size ceiling for a single downloaded file.
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Separator between individual file texts within one document slot.
pub const DOC_SEPARATOR: &str = "\n\n---\n\n";

/// Objective used when the user leaves it blank in the file-upload flow.
pub const DEFAULT_OBJECTIVE: &str = "Compare Source against Target documents";

/// Maximum tokens the completion endpoint may generate.
pub const COMPLETION_MAX_TOKENS: u32 = 2000;

/// Sampling temperature, kept low for repeatable analytical output.
pub const COMPLETION_TEMPERATURE: f32 = 0.1;

/// Nucleus sampling parameter.
pub const COMPLETION_TOP_P: f32 = 0.95;

/// Total completion attempts, including the first one.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base delay before the first retry; doubles on each subsequent attempt.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Upper bound on the random jitter added to each retry delay.
pub const RETRY_JITTER_MAX: Duration = Duration::from_secs(1);

/// Bound on one analysis call including every retry and backoff delay.
pub const COMPLETION_OVERALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Root of the secret configuration file (~/.config/gapscan/secret.json).
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub completion: Option<CompletionSecretConfig>,
}

/// Credentials and endpoint settings for the completion API.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CompletionSecretConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_key: String,
    /// Deployment (model) name; defaults to `gpt-4o-mini`.
    #[serde(default)]
    pub deployment: Option<String>,
    /// API version query parameter; defaults to `2024-06-01`.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Default deployment when none is configured.
pub const DEFAULT_COMPLETION_DEPLOYMENT: &str = "gpt-4o-mini";

/// Default API version when none is configured.
pub const DEFAULT_COMPLETION_API_VERSION: &str = "2024-06-01";
