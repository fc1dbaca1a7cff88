use crate::error::Result;
use crate::types::{AnalogyResult, FeedbackReceipt, FeedbackSubmission};
use async_trait::async_trait;

/// Remote service that generates analogies and records feedback about them
#[async_trait]
pub trait AnalogyService: Send + Sync {
    /// Ask the service for an analogy explaining `question`
    async fn generate_analogy(&self, question: &str) -> Result<AnalogyResult>;

    /// Record ratings and a comment about a previously generated analogy
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<FeedbackReceipt>;

    /// Check if the service is reachable
    async fn is_available(&self) -> bool;

    /// Base address requests are sent to
    fn endpoint(&self) -> &str;
}
