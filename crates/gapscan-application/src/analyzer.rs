//! Gap-analysis orchestrator.
//!
//! Validates the three inputs, builds the completion prompts, and runs
//! the completion call under the retry policy, all bounded by one
//! overall timeout.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use gapscan_core::config::COMPLETION_OVERALL_TIMEOUT;
use gapscan_core::error::{AnalysisError, CompletionError};
use gapscan_core::session::InputMode;
use gapscan_core::validate;
use gapscan_interaction::{
    CompletionAgent, CompletionTuning, RetryPolicy, SYSTEM_PROMPT, Sleeper, TokioSleeper,
    complete_with_retry,
};

/// Runs one gap analysis end to end.
pub struct GapAnalyzer {
    agent: Arc<dyn CompletionAgent>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    tuning: CompletionTuning,
    overall_timeout: Duration,
}

impl GapAnalyzer {
    pub fn new(agent: Arc<dyn CompletionAgent>) -> Self {
        Self {
            agent,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            tuning: CompletionTuning::default(),
            overall_timeout: COMPLETION_OVERALL_TIMEOUT,
        }
    }

    /// Replaces the sleeper used between retries. Tests install a no-op
    /// sleeper so backoff takes no wall-clock time.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Validates inputs and produces the analysis text.
    ///
    /// Returns the completion verbatim apart from trimming surrounding
    /// whitespace; no rewriting of the model output happens here.
    pub async fn analyze(
        &self,
        doc_a: &str,
        doc_b: &str,
        objective: &str,
        mode: InputMode,
    ) -> Result<String, AnalysisError> {
        validate::validate(doc_a, doc_b, objective, mode)?;

        let user_prompt = build_user_prompt(doc_a, doc_b, objective);
        info!(
            mode = ?mode,
            doc_a_chars = doc_a.len(),
            doc_b_chars = doc_b.len(),
            "starting gap analysis"
        );

        let completion = tokio::time::timeout(
            self.overall_timeout,
            complete_with_retry(
                self.agent.as_ref(),
                self.sleeper.as_ref(),
                &self.policy,
                SYSTEM_PROMPT,
                &user_prompt,
                self.tuning,
            ),
        )
        .await
        .map_err(|_| {
            CompletionError::Other(format!(
                "analysis timed out after {} seconds",
                self.overall_timeout.as_secs()
            ))
        })??;

        Ok(completion.trim().to_string())
    }
}

fn build_user_prompt(doc_a: &str, doc_b: &str, objective: &str) -> String {
    format!("Document A:\n{doc_a}\n\nDocument B:\n{doc_b}\n\nAnalysis Objective: {objective}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gapscan_core::error::ValidationError;
    use gapscan_interaction::NoSleep;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct RecordingAgent {
        calls: AtomicU32,
        last_user_prompt: Mutex<String>,
        results: Mutex<Vec<Result<String, CompletionError>>>,
    }

    impl RecordingAgent {
        fn new(results: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                last_user_prompt: Mutex::new(String::new()),
                results: Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl CompletionAgent for RecordingAgent {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            _tuning: CompletionTuning,
        ) -> Result<String, CompletionError> {
            assert_eq!(system_prompt, SYSTEM_PROMPT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user_prompt.lock().unwrap() = user_prompt.to_string();
            self.results.lock().unwrap().remove(0)
        }
    }

    fn analyzer_with(agent: Arc<RecordingAgent>) -> GapAnalyzer {
        GapAnalyzer::new(agent).with_sleeper(Arc::new(NoSleep))
    }

    const DOC_A: &str = "Current policy: passwords rotate every 90 days.";
    const DOC_B: &str = "Target policy: passwords must rotate every 30 days.";

    #[tokio::test]
    async fn happy_path_calls_agent_once_with_both_documents() {
        let agent = Arc::new(RecordingAgent::new(vec![Ok("  GAP: rotation.  ".into())]));
        let analyzer = analyzer_with(agent.clone());

        let result = analyzer
            .analyze(DOC_A, DOC_B, "Compare rotation rules", InputMode::Paste)
            .await
            .unwrap();

        assert_eq!(result, "GAP: rotation.");
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);

        let prompt = agent.last_user_prompt.lock().unwrap().clone();
        assert!(prompt.starts_with("Document A:\n"));
        assert!(prompt.contains(DOC_A));
        assert!(prompt.contains(&format!("Document B:\n{DOC_B}")));
        assert!(prompt.ends_with("Analysis Objective: Compare rotation rules"));
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_the_agent() {
        let agent = Arc::new(RecordingAgent::new(vec![]));
        let analyzer = analyzer_with(agent.clone());

        let err = analyzer
            .analyze("", DOC_B, "objective", InputMode::Paste)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Validation(ValidationError::DocumentARequired)
        );
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_up_to_the_bound() {
        let throttled = || CompletionError::RateLimited {
            message: "throttled".into(),
        };
        let agent = Arc::new(RecordingAgent::new(vec![
            Err(throttled()),
            Err(throttled()),
            Err(throttled()),
        ]));
        let analyzer = analyzer_with(agent.clone());

        let err = analyzer
            .analyze(DOC_A, DOC_B, "objective text", InputMode::Paste)
            .await
            .unwrap_err();

        assert_eq!(agent.calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            err,
            AnalysisError::Completion(CompletionError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn terminal_failure_is_not_retried() {
        let agent = Arc::new(RecordingAgent::new(vec![Err(
            CompletionError::InvalidRequest("context length exceeded".into()),
        )]));
        let analyzer = analyzer_with(agent.clone());

        let err = analyzer
            .analyze(DOC_A, DOC_B, "objective text", InputMode::Paste)
            .await
            .unwrap_err();

        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            err,
            AnalysisError::Completion(CompletionError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn recovery_after_transient_failure_succeeds() {
        let agent = Arc::new(RecordingAgent::new(vec![
            Err(CompletionError::ServerError {
                status: Some(503),
                message: "upstream down".into(),
            }),
            Ok("NO GAP found.".into()),
        ]));
        let analyzer = analyzer_with(agent.clone());

        let result = analyzer
            .analyze(DOC_A, DOC_B, "objective text", InputMode::File)
            .await
            .unwrap();

        assert_eq!(result, "NO GAP found.");
        assert_eq!(agent.calls.load(Ordering::SeqCst), 2);
    }
}
