//! Inbound session events.
//!
//! The host adapter decodes whatever its chat surface delivers (text,
//! attachments, card submissions) into one `SessionEvent` per turn.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recognized text command keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// `start`, `hi`, `hello`, `help`, `begin`
    Start,
    /// `about`
    About,
    /// `status`
    Status,
    /// `cancel`, `reset`, `start over`
    Cancel,
}

impl Command {
    /// Case-insensitive keyword match against a raw message text.
    pub fn parse(text: &str) -> Option<Command> {
        match text.trim().to_lowercase().as_str() {
            "start" | "hi" | "hello" | "help" | "begin" => Some(Command::Start),
            "about" => Some(Command::About),
            "status" => Some(Command::Status),
            "cancel" | "reset" | "start over" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// A retrievable file attachment as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Download URL or opaque content handle.
    pub url: String,
    pub filename: String,
}

impl FileRef {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Actions a card submission can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CardAction {
    /// "Attach Files" on the welcome prompt.
    UploadDocs,
    /// "Paste Text" on the welcome prompt.
    PasteText,
    /// The paste form's analyze button, with all three fields.
    AnalyzeText {
        doc_a: String,
        doc_b: String,
        objective: String,
    },
    /// Objective form submission in the file-upload flow; a blank
    /// objective means "use the default".
    SubmitObjective { objective: String },
    /// "Start Over" from any prompt.
    StartOver,
}

/// A card submission plus the correlation token the card carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSubmission {
    /// Token embedded in the card when it was issued. A mismatch with
    /// the session's current token marks the submission stale.
    pub token: Option<Uuid>,
    pub action: CardAction,
}

/// One inbound event, processed to completion before the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Plain message text (commands or free chatter).
    Text { content: String },
    /// File attachments, in the order the host received them.
    Attachments { files: Vec<FileRef> },
    /// An interactive card submission.
    Submission(CardSubmission),
}
