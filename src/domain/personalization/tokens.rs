//! Placeholder detection for `{formfield=...}` tokens

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::submission::Answers;

lazy_static! {
    /// Plain or percent-encoded braces around `formfield=<id>`.
    /// Opening and closing delimiters are matched independently.
    pub(crate) static ref TOKEN_PATTERN: Regex =
        Regex::new(r"(\{|%7B)formfield=(.*?)(\}|%7D)").expect("token pattern is valid");
}

/// How a placeholder's braces were written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderEncoding {
    /// `{formfield=id}`
    Plain,
    /// `%7Bformfield=id%7D`
    PercentEncoded,
    /// One brace plain, the other percent-encoded
    Mixed,
}

/// A placeholder found in template content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Exact matched text, used as the substitution key
    pub literal: String,

    /// Referenced form field identifier
    pub field_id: String,

    /// Brace encoding of the literal
    pub encoding: PlaceholderEncoding,
}

impl Placeholder {
    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let encoding = match (&caps[1], &caps[3]) {
            ("{", "}") => PlaceholderEncoding::Plain,
            ("%7B", "%7D") => PlaceholderEncoding::PercentEncoded,
            _ => PlaceholderEncoding::Mixed,
        };

        Self {
            literal: caps[0].to_string(),
            field_id: caps[2].to_string(),
            encoding,
        }
    }
}

/// Scan content for placeholders in order of appearance, duplicates included
pub fn find_placeholders(content: &str) -> Vec<Placeholder> {
    TOKEN_PATTERN
        .captures_iter(content)
        .map(|caps| Placeholder::from_captures(&caps))
        .collect()
}

/// Placeholder literal to substitution value mapping.
///
/// Each literal appears once, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    entries: Vec<(Placeholder, String)>,
    index: HashMap<String, usize>,
}

impl TokenMap {
    /// Substitution value for an exact literal
    pub fn value_of(&self, literal: &str) -> Option<&str> {
        self.index
            .get(literal)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.index.contains_key(literal)
    }

    /// Placeholders with their values, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &str)> {
        self.entries.iter().map(|(p, v)| (p, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert unless the literal was already seen
    fn insert_first(&mut self, placeholder: Placeholder, value: String) {
        if self.index.contains_key(&placeholder.literal) {
            return;
        }
        self.index
            .insert(placeholder.literal.clone(), self.entries.len());
        self.entries.push((placeholder, value));
    }
}

/// Resolve every placeholder in `content` against `answers`.
///
/// Missing and empty answers resolve to `""` so the placeholder is removed
/// rather than left in the output.
pub fn extract_tokens(content: &str, answers: &Answers) -> TokenMap {
    let mut tokens = TokenMap::default();

    for placeholder in find_placeholders(content) {
        if tokens.contains(&placeholder.literal) {
            continue;
        }
        let value = answers.get(&placeholder.field_id).substitution().to_string();
        tokens.insert_first(placeholder, value);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> Answers {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_no_placeholders() {
        let tokens = extract_tokens("Hello there", &answers(&[("fname", "Ann")]));
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_extract_simple() {
        let tokens = extract_tokens(
            "Hi {formfield=fname}, you said {formfield=color}.",
            &answers(&[("fname", "Ann"), ("color", "blue")]),
        );

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.value_of("{formfield=fname}"), Some("Ann"));
        assert_eq!(tokens.value_of("{formfield=color}"), Some("blue"));
    }

    #[test]
    fn test_duplicate_literal_appears_once() {
        let tokens = extract_tokens(
            "{formfield=fname} and again {formfield=fname}",
            &answers(&[("fname", "Ann")]),
        );

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.value_of("{formfield=fname}"), Some("Ann"));
    }

    #[test]
    fn test_encodings_tracked_independently() {
        let tokens = extract_tokens(
            "<a href=\"/?n=%7Bformfield=fname%7D\">{formfield=fname}</a>",
            &answers(&[("fname", "Ann")]),
        );

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.value_of("%7Bformfield=fname%7D"), Some("Ann"));
        assert_eq!(tokens.value_of("{formfield=fname}"), Some("Ann"));

        let encodings: Vec<_> = tokens.iter().map(|(p, _)| p.encoding).collect();
        assert_eq!(
            encodings,
            vec![PlaceholderEncoding::PercentEncoded, PlaceholderEncoding::Plain]
        );
    }

    #[test]
    fn test_mixed_delimiters_are_recognised() {
        let placeholders = find_placeholders("x {formfield=city%7D y");

        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].field_id, "city");
        assert_eq!(placeholders[0].encoding, PlaceholderEncoding::Mixed);
    }

    #[test]
    fn test_missing_and_empty_resolve_to_empty_string() {
        let mut bag = answers(&[("color", "")]);
        bag.insert_empty("city");

        let tokens = extract_tokens(
            "{formfield=color}{formfield=city}{formfield=unknown}",
            &bag,
        );

        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|(_, value)| value.is_empty()));
    }

    #[test]
    fn test_identifier_is_non_greedy() {
        let placeholders = find_placeholders("{formfield=a}{formfield=b}");

        let ids: Vec<_> = placeholders.iter().map(|p| p.field_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_first_seen_order() {
        let tokens = extract_tokens(
            "{formfield=b} {formfield=a} {formfield=b}",
            &Answers::new(),
        );

        let literals: Vec<_> = tokens.iter().map(|(p, _)| p.literal.as_str()).collect();
        assert_eq!(literals, vec!["{formfield=b}", "{formfield=a}"]);
    }
}
