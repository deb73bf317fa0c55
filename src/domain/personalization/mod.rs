//! Form-field personalization.
//!
//! Templates reference submitted answers with `{formfield=<id>}` or its
//! percent-encoded form `%7Bformfield=<id>%7D`. Token maps are built fresh for
//! every (template, submission) pair.
//!
//! # Example
//!
//! ```ignore
//! let answers: Answers = [("fname", "Ann")].into_iter().collect();
//! let content = personalize("Hi {formfield=fname}!", &answers);
//! assert_eq!(content, "Hi Ann!");
//! ```

mod engine;
mod tokens;

pub use engine::personalize;
pub use tokens::{extract_tokens, find_placeholders, Placeholder, PlaceholderEncoding, TokenMap};
