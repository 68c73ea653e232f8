//! Completion agent trait.
//!
//! One operation: complete a system/user prompt pair into text. The
//! orchestration layer owns the retry policy; implementations only
//! classify their failures so the policy can tell transient from
//! terminal.

use async_trait::async_trait;

use gapscan_core::config::{COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE, COMPLETION_TOP_P};
use gapscan_core::error::CompletionError;

/// Generation settings for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionTuning {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for CompletionTuning {
    fn default() -> Self {
        Self {
            max_tokens: COMPLETION_MAX_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
            top_p: COMPLETION_TOP_P,
        }
    }
}

/// Trait all completion endpoints implement.
#[async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Generates text for the given prompt pair.
    ///
    /// Returns the raw response content; callers trim it. Failures are
    /// classified per [`CompletionError`].
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tuning: CompletionTuning,
    ) -> Result<String, CompletionError>;
}
