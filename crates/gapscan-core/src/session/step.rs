//! Conversation step for the upload flow.

use serde::{Deserialize, Serialize};

/// Where a session currently sits in the document-intake flow.
///
/// `WaitingObjective` is only entered in file mode, after Document B has
/// been accepted and no objective is set yet. A completed analysis or an
/// explicit reset always loops back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    WaitingDocA,
    WaitingDocB,
    WaitingObjective,
}

impl Step {
    /// Short name used in status reports and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::WaitingDocA => "waiting_doc_a",
            Step::WaitingDocB => "waiting_doc_b",
            Step::WaitingObjective => "waiting_objective",
        }
    }
}
