//! Per-turn session state machine.
//!
//! One inbound event per conversation is processed to completion: load
//! the session, apply the transition, issue the next prompt, save. The
//! session is saved only when the turn succeeds; an unexpected failure
//! leaves the stored state untouched and renders a generic error.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gapscan_core::config::{DEFAULT_OBJECTIVE, MAX_DOC_B_FILES};
use gapscan_core::prompt::{ConversationSurface, Prompt};
use gapscan_core::session::{
    CardAction, CardSubmission, Command, DocumentSlot, FileRef, InputMode, Session,
    SessionEvent, SessionRepository, Step,
};
use gapscan_interaction::DocumentExtractor;

use crate::analyzer::GapAnalyzer;

const ABOUT_TEXT: &str = "I compare a source document (Document A) against one or more target \
    documents (Document B) and report the gaps for a stated objective. Type 'start' to begin.";

const UNRECOGNIZED_HINT: &str = "I didn't recognize that. Type 'start' to begin, 'status' to \
    see progress, or 'cancel' to start over.";

const RESET_CONFIRMATION: &str = "Okay, starting over. Your previous documents were cleared.";

const GENERIC_ERROR_TEXT: &str =
    "Something went wrong processing your request. Please try again or type 'start over'.";

/// Drives the conversation for every session.
pub struct TurnProcessor {
    sessions: Arc<dyn SessionRepository>,
    extractor: Arc<dyn DocumentExtractor>,
    surface: Arc<dyn ConversationSurface>,
    analyzer: GapAnalyzer,
}

impl TurnProcessor {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        extractor: Arc<dyn DocumentExtractor>,
        surface: Arc<dyn ConversationSurface>,
        analyzer: GapAnalyzer,
    ) -> Self {
        Self {
            sessions,
            extractor,
            surface,
            analyzer,
        }
    }

    /// Processes one inbound event for the given conversation.
    ///
    /// The host must serialize calls per conversation key; distinct
    /// conversations may be processed in parallel.
    pub async fn process(&self, session_key: &str, event: SessionEvent) -> Result<()> {
        let mut session = self
            .sessions
            .find_by_id(session_key)
            .await?
            .unwrap_or_else(|| Session::new(session_key));

        match self.handle(&mut session, event).await {
            Ok(()) => {
                session.touch();
                self.sessions.save(&session).await?;
                Ok(())
            }
            Err(err) => {
                // Stored session keeps its pre-turn state.
                error!(session_id = %session_key, error = %err, "turn failed");
                if let Err(send_err) = self.surface.send_text(GENERIC_ERROR_TEXT).await {
                    warn!(error = %send_err, "failed to deliver error message");
                }
                Ok(())
            }
        }
    }

    async fn handle(&self, session: &mut Session, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Text { content } => self.handle_text(session, &content).await,
            SessionEvent::Attachments { files } => self.handle_attachments(session, files).await,
            SessionEvent::Submission(submission) => {
                self.handle_submission(session, submission).await
            }
        }
    }

    async fn handle_text(&self, session: &mut Session, content: &str) -> Result<()> {
        match Command::parse(content) {
            Some(Command::Start) => self.issue_prompt(session, Prompt::Welcome).await,
            Some(Command::About) => self.surface.send_text(ABOUT_TEXT).await,
            Some(Command::Status) => self.surface.send_text(&session.status_line()).await,
            Some(Command::Cancel) => self.start_over(session).await,
            None => {
                self.surface.send_text(UNRECOGNIZED_HINT).await?;
                self.issue_prompt(session, Prompt::Welcome).await
            }
        }
    }

    async fn handle_attachments(&self, session: &mut Session, files: Vec<FileRef>) -> Result<()> {
        match session.step {
            // Files sent without going through the welcome card start
            // the upload flow implicitly.
            Step::Idle | Step::WaitingDocA => {
                if session.step == Step::Idle {
                    // A new cycle never inherits documents from the
                    // previous one.
                    session.doc_a.clear();
                    session.doc_b.clear();
                    session.objective.clear();
                }
                session.input_mode = InputMode::File;
                session.step = Step::WaitingDocA;

                let accepted = self
                    .accumulate(&mut session.doc_a, &files, usize::MAX)
                    .await;
                if accepted == 0 {
                    return self
                        .issue_prompt(
                            session,
                            Prompt::error(
                                "None of the attached files could be read. Supported types: \
                                 .txt, .pdf, .docx, .doc (max 10 MB each). Please try again.",
                            ),
                        )
                        .await;
                }

                session.step = Step::WaitingDocB;
                let filename = session.doc_a.display_name();
                self.issue_prompt(session, Prompt::DocAReceived { filename })
                    .await
            }
            Step::WaitingDocB | Step::WaitingObjective => {
                if session.doc_b.file_count() >= MAX_DOC_B_FILES {
                    return self
                        .issue_prompt(
                            session,
                            Prompt::error(format!(
                                "Document B already has the maximum of {MAX_DOC_B_FILES} files. \
                                 Submit an objective to run the analysis, or type 'start over'."
                            )),
                        )
                        .await;
                }

                let accepted = self
                    .accumulate(&mut session.doc_b, &files, MAX_DOC_B_FILES)
                    .await;
                if accepted == 0 {
                    return self
                        .issue_prompt(
                            session,
                            Prompt::error(
                                "None of the attached files could be read. Supported types: \
                                 .txt, .pdf, .docx, .doc (max 10 MB each). Please try again.",
                            ),
                        )
                        .await;
                }

                session.step = Step::WaitingObjective;
                let filename = session.doc_b.display_name();
                let objective = session.objective.clone();
                self.issue_prompt(
                    session,
                    Prompt::ObjectivePrompt {
                        filename,
                        objective,
                    },
                )
                .await
            }
        }
    }

    async fn handle_submission(
        &self,
        session: &mut Session,
        submission: CardSubmission,
    ) -> Result<()> {
        if submission.token != session.current_token() {
            debug!(
                session_id = %session.id,
                submitted = ?submission.token,
                "dropping stale submission"
            );
            return Ok(());
        }

        match submission.action {
            CardAction::UploadDocs => {
                session.doc_a.clear();
                session.doc_b.clear();
                session.objective.clear();
                session.input_mode = InputMode::File;
                session.step = Step::WaitingDocA;
                self.issue_prompt(session, Prompt::UploadDocA).await
            }
            CardAction::PasteText => {
                session.input_mode = InputMode::Paste;
                let form = Prompt::PasteForm {
                    doc_a: session.doc_a.combined_text(),
                    doc_b: session.doc_b.combined_text(),
                    objective: session.objective.clone(),
                };
                self.issue_prompt(session, form).await
            }
            CardAction::AnalyzeText {
                doc_a,
                doc_b,
                objective,
            } => self.run_paste_analysis(session, doc_a, doc_b, objective).await,
            CardAction::SubmitObjective { objective } => {
                self.run_file_analysis(session, objective).await
            }
            CardAction::StartOver => self.start_over(session).await,
        }
    }

    /// Paste mode completes in one round trip from any step.
    async fn run_paste_analysis(
        &self,
        session: &mut Session,
        doc_a: String,
        doc_b: String,
        objective: String,
    ) -> Result<()> {
        session.input_mode = InputMode::Paste;
        session.doc_a.set_pasted(doc_a.clone(), "Pasted Document A");
        session.doc_b.set_pasted(doc_b.clone(), "Pasted Document B");
        session.objective = objective.clone();
        session.step = Step::Idle;

        match self
            .analyzer
            .analyze(&doc_a, &doc_b, &objective, InputMode::Paste)
            .await
        {
            Ok(text) => {
                info!(session_id = %session.id, "paste analysis complete");
                self.issue_prompt(
                    session,
                    Prompt::AnalysisResult {
                        text,
                        doc_a_name: session.doc_a.display_name(),
                        doc_b_names: session.doc_b.filenames().to_vec(),
                        mode: InputMode::Paste,
                    },
                )
                .await
            }
            Err(err) => {
                warn!(session_id = %session.id, error = %err, "paste analysis failed");
                self.issue_prompt(session, Prompt::error(err.to_string()))
                    .await
            }
        }
    }

    /// File-mode objective submission runs the analysis over the
    /// accumulated documents. A blank objective keeps the default.
    async fn run_file_analysis(&self, session: &mut Session, objective: String) -> Result<()> {
        let objective = if objective.trim().is_empty() {
            DEFAULT_OBJECTIVE.to_string()
        } else {
            objective.trim().to_string()
        };
        session.objective = objective.clone();

        let doc_a = session.doc_a.combined_text();
        let doc_b = session.doc_b.combined_text();
        let doc_a_name = session.doc_a.display_name();
        let doc_b_names = session.doc_b.filenames().to_vec();

        match self
            .analyzer
            .analyze(&doc_a, &doc_b, &objective, InputMode::File)
            .await
        {
            Ok(text) => {
                info!(session_id = %session.id, "file analysis complete");
                // Cycle complete; the next upload starts fresh.
                session.reset();
                self.issue_prompt(
                    session,
                    Prompt::AnalysisResult {
                        text,
                        doc_a_name,
                        doc_b_names,
                        mode: InputMode::File,
                    },
                )
                .await
            }
            Err(err) => {
                warn!(session_id = %session.id, error = %err, "file analysis failed");
                // Documents are kept so the user can retry the objective.
                session.step = Step::Idle;
                self.issue_prompt(session, Prompt::error(err.to_string()))
                    .await
            }
        }
    }

    async fn start_over(&self, session: &mut Session) -> Result<()> {
        self.complete_last_prompt(session).await;
        session.reset();
        self.surface.send_text(RESET_CONFIRMATION).await?;
        self.issue_prompt(session, Prompt::Welcome).await
    }

    /// Extracts each attachment in arrival order, skipping failures
    /// with a per-file log, and never growing the slot past `capacity`
    /// files. Returns the number accepted.
    async fn accumulate(
        &self,
        slot: &mut DocumentSlot,
        files: &[FileRef],
        capacity: usize,
    ) -> usize {
        let mut accepted = 0;
        for file in files {
            if slot.file_count() >= capacity {
                warn!(
                    filename = %file.filename,
                    capacity,
                    "skipping attachment over the file cap"
                );
                continue;
            }
            match self.extractor.extract(file).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!(filename = %file.filename, "skipping attachment with no extractable text");
                }
                Ok(text) => {
                    slot.push_file(text, &file.filename);
                    accepted += 1;
                }
                Err(err) => {
                    warn!(filename = %file.filename, error = %err, "skipping attachment");
                }
            }
        }
        accepted
    }

    /// Shows the next prompt with a fresh correlation token, after
    /// best-effort freezing the previous one.
    async fn issue_prompt(&self, session: &mut Session, prompt: Prompt) -> Result<()> {
        self.complete_last_prompt(session).await;
        let token = Uuid::new_v4();
        let handle = self.surface.send_prompt(&prompt, token).await?;
        session.record_prompt(handle, token, prompt);
        Ok(())
    }

    async fn complete_last_prompt(&self, session: &Session) {
        if let Some(prev) = &session.last_prompt {
            if let Err(err) = self.surface.mark_completed(&prev.handle, &prev.prompt).await {
                warn!(
                    session_id = %session.id,
                    prompt_kind = prev.prompt.kind(),
                    error = %err,
                    "could not freeze previous prompt"
                );
            }
        }
    }
}
