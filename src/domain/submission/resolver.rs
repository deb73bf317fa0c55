//! Resolver trait for looking up a recipient's form submissions.

use async_trait::async_trait;

use super::types::Submission;

/// Resolves the submissions a recipient made to a form.
///
/// Implementations must return submissions in a stable order because every
/// submission produces its own dispatch attempt. An empty vector means the
/// recipient has no qualifying submission yet.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across concurrently processed recipients.
#[async_trait]
pub trait FormResultResolver: Send + Sync {
    /// Ordered submissions of `recipient_id` for `form_id`
    async fn resolve(&self, form_id: &str, recipient_id: &str) -> Vec<Submission>;
}
