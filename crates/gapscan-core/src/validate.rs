//! Input validation ahead of gap analysis.
//!
//! Rules run in a fixed order and short-circuit on the first failure,
//! so every input maps to exactly one outcome. The size ceiling depends
//! on the input mode: pasted text is bounded by characters, uploaded
//! files by cl100k_base tokens.

use once_cell::sync::Lazy;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

use crate::config::{MAX_FILE_TOKENS, MAX_PASTE_CHARS, MIN_DOCUMENT_CHARS, MIN_OBJECTIVE_CHARS};
use crate::error::ValidationError;
use crate::session::InputMode;

/// Token counter wrapping tiktoken's cl100k_base tokenizer.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    pub fn new() -> Self {
        let bpe = tiktoken_rs::cl100k_base().expect("failed to load cl100k_base tokenizer");
        Self { bpe: Arc::new(bpe) }
    }

    /// A process-wide shared instance; the BPE tables are immutable and
    /// loading them is the expensive part.
    pub fn shared() -> &'static TokenCounter {
        static SHARED: Lazy<TokenCounter> = Lazy::new(TokenCounter::new);
        &SHARED
    }

    /// Count tokens in the given text.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Size ceilings, separated from the rule logic so boundary behavior is
/// testable without multi-megabyte fixtures.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub min_document_chars: usize,
    pub min_objective_chars: usize,
    pub max_paste_chars: usize,
    pub max_file_tokens: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_document_chars: MIN_DOCUMENT_CHARS,
            min_objective_chars: MIN_OBJECTIVE_CHARS,
            max_paste_chars: MAX_PASTE_CHARS,
            max_file_tokens: MAX_FILE_TOKENS,
        }
    }
}

/// Validates the three inputs for the given mode with default limits.
pub fn validate(
    doc_a: &str,
    doc_b: &str,
    objective: &str,
    mode: InputMode,
) -> Result<(), ValidationError> {
    validate_with_limits(doc_a, doc_b, objective, mode, &Limits::default())
}

/// Rule order: presence (A, B, objective), minimum lengths (A, B,
/// objective), then the mode-specific ceiling over the raw field sizes.
pub fn validate_with_limits(
    doc_a: &str,
    doc_b: &str,
    objective: &str,
    mode: InputMode,
    limits: &Limits,
) -> Result<(), ValidationError> {
    if doc_a.trim().is_empty() {
        return Err(ValidationError::DocumentARequired);
    }
    if doc_b.trim().is_empty() {
        return Err(ValidationError::DocumentBRequired);
    }
    if objective.trim().is_empty() {
        return Err(ValidationError::ObjectiveRequired);
    }

    if doc_a.trim().chars().count() < limits.min_document_chars {
        return Err(ValidationError::DocumentATooShort);
    }
    if doc_b.trim().chars().count() < limits.min_document_chars {
        return Err(ValidationError::DocumentBTooShort);
    }
    if objective.trim().chars().count() < limits.min_objective_chars {
        return Err(ValidationError::ObjectiveTooShort);
    }

    match mode {
        InputMode::Paste => {
            let total = doc_a.chars().count() + doc_b.chars().count() + objective.chars().count();
            if total > limits.max_paste_chars {
                return Err(ValidationError::InputTooLongChars(total));
            }
        }
        InputMode::File => {
            let combined = format!("{doc_a}{doc_b}{objective}");
            let tokens = TokenCounter::shared().count(&combined);
            if tokens > limits.max_file_tokens {
                return Err(ValidationError::InputTooLongTokens(tokens));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(len: usize) -> String {
        "X".repeat(len)
    }

    #[test]
    fn accepts_minimal_valid_inputs() {
        assert_eq!(
            validate(&doc(25), &doc(25), "find gaps", InputMode::Paste),
            Ok(())
        );
        assert_eq!(
            validate(&doc(25), &doc(25), "find gaps", InputMode::File),
            Ok(())
        );
    }

    #[test]
    fn presence_rules_fire_before_length_rules() {
        assert_eq!(
            validate("", "", "", InputMode::Paste),
            Err(ValidationError::DocumentARequired)
        );
        assert_eq!(
            validate(&doc(25), "   \n ", "", InputMode::Paste),
            Err(ValidationError::DocumentBRequired)
        );
        assert_eq!(
            validate(&doc(25), &doc(25), "  ", InputMode::Paste),
            Err(ValidationError::ObjectiveRequired)
        );
    }

    #[test]
    fn minimum_length_boundaries_are_exact() {
        // 20 trimmed chars pass, 19 fail.
        assert_eq!(
            validate(&doc(20), &doc(25), "find gaps", InputMode::Paste),
            Ok(())
        );
        assert_eq!(
            validate(&doc(19), &doc(25), "find gaps", InputMode::Paste),
            Err(ValidationError::DocumentATooShort)
        );
        assert_eq!(
            validate(&doc(25), &doc(19), "find gaps", InputMode::Paste),
            Err(ValidationError::DocumentBTooShort)
        );
        // Surrounding whitespace does not count toward the minimum.
        assert_eq!(
            validate(&format!("  {}  ", doc(19)), &doc(25), "find gaps", InputMode::Paste),
            Err(ValidationError::DocumentATooShort)
        );
        // 5-char objective passes, 4 fails.
        assert_eq!(
            validate(&doc(25), &doc(25), "gaps?", InputMode::Paste),
            Ok(())
        );
        assert_eq!(
            validate(&doc(25), &doc(25), "gaps", InputMode::Paste),
            Err(ValidationError::ObjectiveTooShort)
        );
    }

    #[test]
    fn paste_char_ceiling_is_exact() {
        let doc_a = doc(10_000);
        let doc_b = doc(10_000);

        // 10_000 + 10_000 + 999 = 20_999 -> valid.
        let objective = "o".repeat(999);
        assert_eq!(
            validate(&doc_a, &doc_b, &objective, InputMode::Paste),
            Ok(())
        );

        // 21_000 total is still within the ceiling.
        let objective = "o".repeat(1_000);
        assert_eq!(
            validate(&doc_a, &doc_b, &objective, InputMode::Paste),
            Ok(())
        );

        // 21_001 total -> rejected with the measured size.
        let objective = "o".repeat(1_001);
        assert_eq!(
            validate(&doc_a, &doc_b, &objective, InputMode::Paste),
            Err(ValidationError::InputTooLongChars(21_001))
        );
    }

    #[test]
    fn file_token_ceiling_is_exact() {
        let doc_a = doc(40);
        let doc_b = doc(40);
        let objective = "compare the documents";
        let tokens =
            TokenCounter::shared().count(&format!("{doc_a}{doc_b}{objective}"));

        // A ceiling of exactly the measured count is accepted...
        let mut limits = Limits {
            max_file_tokens: tokens,
            ..Limits::default()
        };
        assert_eq!(
            validate_with_limits(&doc_a, &doc_b, objective, InputMode::File, &limits),
            Ok(())
        );

        // ...and one token fewer rejects with the measured count.
        limits.max_file_tokens = tokens - 1;
        assert_eq!(
            validate_with_limits(&doc_a, &doc_b, objective, InputMode::File, &limits),
            Err(ValidationError::InputTooLongTokens(tokens))
        );
    }

    #[test]
    fn paste_ceiling_does_not_apply_in_file_mode() {
        // Far above the char ceiling but trivially within the token one.
        let doc_a = doc(15_000);
        let doc_b = doc(15_000);
        assert_eq!(
            validate(&doc_a, &doc_b, "find gaps", InputMode::File),
            Ok(())
        );
        assert_eq!(
            validate(&doc_a, &doc_b, "find gaps", InputMode::Paste),
            Err(ValidationError::InputTooLongChars(30_009))
        );
    }

    #[test]
    fn token_counter_counts_plain_ascii() {
        let counter = TokenCounter::shared();
        assert_eq!(counter.count(""), 0);
        assert!(counter.count("hello world") >= 2);
    }
}
