use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::cache::ContentCacheHandle;
use crate::capability::CapabilityError;
use crate::types::ConversationHistory;

/// Finite, non-resumable sequence of answer fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, CapabilityError>> + Send>>;

pub enum Answer {
    Complete(String),
    Stream(FragmentStream),
}

pub struct GenerationRequest<'a> {
    pub question: &'a str,
    /// Turns before this question.
    pub history: &'a ConversationHistory,
    pub handle: &'a ContentCacheHandle,
    /// Preference only; a generator may still return [`Answer::Complete`].
    pub stream: bool,
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Answer, CapabilityError>;
}
