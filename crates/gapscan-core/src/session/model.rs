//! Session domain model.
//!
//! `Session` is the only mutable state in the system. It is scoped to
//! one conversation key and mutated exclusively by the turn processor,
//! one event at a time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::Step;
use crate::config::DOC_SEPARATOR;
use crate::prompt::{Prompt, PromptHandle};

/// Which size-limit policy the validator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Pasted text; combined character ceiling.
    #[default]
    Paste,
    /// Uploaded files; combined token ceiling.
    File,
}

/// Accumulated text and display names for one document.
///
/// Built incrementally from uploaded files (arrival order preserved) or
/// set atomically from a paste submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSlot {
    texts: Vec<String>,
    filenames: Vec<String>,
}

impl DocumentSlot {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.texts.len()
    }

    /// Replaces any accumulated content with a single pasted text.
    pub fn set_pasted(&mut self, text: impl Into<String>, display_name: impl Into<String>) {
        self.texts = vec![text.into()];
        self.filenames = vec![display_name.into()];
    }

    /// Appends one extracted file in arrival order.
    pub fn push_file(&mut self, text: impl Into<String>, filename: impl Into<String>) {
        self.texts.push(text.into());
        self.filenames.push(filename.into());
    }

    /// The text handed to the analyzer; multiple files are joined with a
    /// visible separator in the order they were received.
    pub fn combined_text(&self) -> String {
        self.texts.join(DOC_SEPARATOR)
    }

    /// Name shown on prompts: the filename for a single file, a count
    /// for several, `None` while empty.
    pub fn display_name(&self) -> String {
        match self.filenames.len() {
            0 => "None".to_string(),
            1 => self.filenames[0].clone(),
            n => format!("{} File(s)", n),
        }
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn clear(&mut self) {
        self.texts.clear();
        self.filenames.clear();
    }
}

/// Bookkeeping for the most recently shown interactive prompt.
///
/// The correlation token is single-use: issuing the next prompt rotates
/// it, so late submissions against this one are recognized as stale. The
/// retained `prompt` is what the surface needs to render the read-only
/// version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedPrompt {
    pub handle: PromptHandle,
    pub token: Uuid,
    pub prompt: Prompt,
}

/// Per-conversation state, created lazily on first interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub step: Step,
    pub input_mode: InputMode,
    pub doc_a: DocumentSlot,
    pub doc_b: DocumentSlot,
    pub objective: String,
    pub last_prompt: Option<IssuedPrompt>,
    pub created_at: String,
    pub updated_at: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            step: Step::Idle,
            input_mode: InputMode::Paste,
            doc_a: DocumentSlot::default(),
            doc_b: DocumentSlot::default(),
            objective: String::new(),
            last_prompt: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Clears every per-cycle field together. Partial resets are
    /// disallowed; stale cross-document state must never survive.
    pub fn reset(&mut self) {
        self.step = Step::Idle;
        self.input_mode = InputMode::Paste;
        self.doc_a.clear();
        self.doc_b.clear();
        self.objective.clear();
        self.last_prompt = None;
    }

    /// The token a submission must carry to be accepted.
    pub fn current_token(&self) -> Option<Uuid> {
        self.last_prompt.as_ref().map(|p| p.token)
    }

    /// Records the freshly issued prompt and returns the prompt it
    /// supersedes, if any.
    pub fn record_prompt(&mut self, handle: PromptHandle, token: Uuid, prompt: Prompt) -> Option<IssuedPrompt> {
        self.last_prompt.replace(IssuedPrompt {
            handle,
            token,
            prompt,
        })
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// One-line report for the `status` command.
    pub fn status_line(&self) -> String {
        format!(
            "State: {}\nDocA: {}\nDocB: {}",
            self.step.as_str(),
            self.doc_a.display_name(),
            self.doc_b.display_name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_display_name_counts_files() {
        let mut slot = DocumentSlot::default();
        assert_eq!(slot.display_name(), "None");

        slot.push_file("text one", "a.pdf");
        assert_eq!(slot.display_name(), "a.pdf");

        slot.push_file("text two", "b.txt");
        assert_eq!(slot.display_name(), "2 File(s)");
    }

    #[test]
    fn slot_joins_files_in_arrival_order() {
        let mut slot = DocumentSlot::default();
        slot.push_file("first", "1.txt");
        slot.push_file("second", "2.txt");
        assert_eq!(slot.combined_text(), "first\n\n---\n\nsecond");
    }

    #[test]
    fn paste_replaces_accumulated_files() {
        let mut slot = DocumentSlot::default();
        slot.push_file("old", "old.txt");
        slot.set_pasted("pasted", "Pasted Document A");
        assert_eq!(slot.combined_text(), "pasted");
        assert_eq!(slot.display_name(), "Pasted Document A");
    }

    #[test]
    fn reset_clears_every_field_and_is_idempotent() {
        let mut session = Session::new("conv-1");
        session.step = Step::WaitingDocB;
        session.input_mode = InputMode::File;
        session.doc_a.push_file("text", "a.pdf");
        session.doc_b.push_file("text", "b.pdf");
        session.objective = "find gaps".to_string();
        session.record_prompt(
            PromptHandle("msg-1".into()),
            Uuid::new_v4(),
            Prompt::Welcome,
        );

        session.reset();
        let once = session.clone();
        session.reset();

        assert_eq!(session, once);
        assert_eq!(session.step, Step::Idle);
        assert_eq!(session.input_mode, InputMode::Paste);
        assert!(session.doc_a.is_empty());
        assert!(session.doc_b.is_empty());
        assert!(session.objective.is_empty());
        assert!(session.last_prompt.is_none());
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = Session::new("conv-2");
        session.doc_a.set_pasted("some document text here", "Pasted Document A");
        session.step = Step::WaitingDocB;

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
