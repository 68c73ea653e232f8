//! Prompt kinds and the conversation surface boundary.
//!
//! A `Prompt` is the data for one user-facing card; the host surface
//! owns the actual rendering. Replacing string card-type tags with this
//! sum type lets the surface match exhaustively, including when it
//! renders the read-only (completed) version of a superseded prompt.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::InputMode;

/// Opaque handle to a shown prompt (e.g. a chat activity id), used for
/// best-effort retroactive edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptHandle(pub String);

/// Everything the surface needs to render one interactive prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// Entry card offering "Paste Text" and "Attach Files".
    Welcome,
    /// Step 1: attach the Document A (source) file(s).
    UploadDocA,
    /// Document A accepted; asks for Document B files next.
    DocAReceived { filename: String },
    /// Paste form, pre-filled with any retained prior values.
    PasteForm {
        doc_a: String,
        doc_b: String,
        objective: String,
    },
    /// Document B accepted; asks for the analysis objective (blank
    /// submission keeps the default).
    ObjectivePrompt {
        filename: String,
        objective: String,
    },
    /// A finished analysis.
    AnalysisResult {
        text: String,
        doc_a_name: String,
        doc_b_names: Vec<String>,
        mode: InputMode,
    },
    /// A user-visible failure with a retry/start-over affordance.
    Error { message: String },
}

impl Prompt {
    pub fn error(message: impl Into<String>) -> Self {
        Prompt::Error {
            message: message.into(),
        }
    }

    /// Stable tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Prompt::Welcome => "welcome",
            Prompt::UploadDocA => "upload_doc_a",
            Prompt::DocAReceived { .. } => "doc_a_received",
            Prompt::PasteForm { .. } => "paste_form",
            Prompt::ObjectivePrompt { .. } => "objective_prompt",
            Prompt::AnalysisResult { .. } => "analysis_result",
            Prompt::Error { .. } => "error",
        }
    }
}

/// Minimal contract the turn processor needs from its host chat surface.
///
/// `mark_completed` is best-effort: some surfaces cannot edit messages
/// retroactively, and a failure there is logged but never fatal.
#[async_trait]
pub trait ConversationSurface: Send + Sync {
    /// Shows an interactive prompt carrying the given correlation token
    /// and returns a handle for later edits.
    async fn send_prompt(&self, prompt: &Prompt, token: Uuid) -> Result<PromptHandle>;

    /// Re-renders a previously shown prompt in its read-only form.
    async fn mark_completed(&self, handle: &PromptHandle, prompt: &Prompt) -> Result<()>;

    /// Sends a plain text message.
    async fn send_text(&self, text: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_kind_tags_are_distinct() {
        let prompts = [
            Prompt::Welcome,
            Prompt::UploadDocA,
            Prompt::DocAReceived {
                filename: "a.pdf".into(),
            },
            Prompt::PasteForm {
                doc_a: String::new(),
                doc_b: String::new(),
                objective: String::new(),
            },
            Prompt::ObjectivePrompt {
                filename: "a.pdf".into(),
                objective: String::new(),
            },
            Prompt::AnalysisResult {
                text: "ok".into(),
                doc_a_name: "a.pdf".into(),
                doc_b_names: vec!["b.pdf".into()],
                mode: InputMode::File,
            },
            Prompt::error("boom"),
        ];

        let mut kinds: Vec<&str> = prompts.iter().map(|p| p.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), prompts.len());
    }

    #[test]
    fn prompt_serializes_with_kind_tag() {
        let json = serde_json::to_value(Prompt::DocAReceived {
            filename: "spec.docx".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "doc_a_received");
        assert_eq!(json["filename"], "spec.docx");
    }
}
