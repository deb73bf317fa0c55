//! Per-submission content rewriting

use super::tokens::{extract_tokens, TOKEN_PATTERN};
use crate::domain::submission::Answers;

/// Substitute every `formfield` placeholder in `template` with the matching
/// answer.
///
/// Substitution is a single pass over the original template: substituted
/// values are never scanned again, so an answer that itself looks like a
/// placeholder is emitted verbatim.
pub fn personalize(template: &str, answers: &Answers) -> String {
    let tokens = extract_tokens(template, answers);
    if tokens.is_empty() {
        return template.to_string();
    }

    TOKEN_PATTERN
        .replace_all(template, |caps: &regex::Captures<'_>| {
            tokens.value_of(&caps[0]).unwrap_or_default().to_string()
        })
        .into_owned()
}
