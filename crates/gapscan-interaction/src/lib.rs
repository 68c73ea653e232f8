//! External collaborators for Gapscan.
//!
//! This crate implements the two seams the core depends on: the
//! completion agent (an Azure-OpenAI-compatible chat-completions REST
//! client plus the bounded retry policy around it) and the document
//! extractor (download, format gate, per-format text extraction).

pub mod azure_api_agent;
pub mod completion;
pub mod extractor;
pub mod parsers;
pub mod retry;
pub mod system_prompt;

pub use azure_api_agent::AzureCompletionAgent;
pub use completion::{CompletionAgent, CompletionTuning};
pub use extractor::{DocumentExtractor, HttpDocumentExtractor};
pub use retry::{NoSleep, RetryPolicy, Sleeper, TokioSleeper, complete_with_retry};
pub use system_prompt::{SYSTEM_PROMPT, SYSTEM_PROMPT_VERSION};
