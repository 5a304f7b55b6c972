use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::capability::FragmentStream;
use crate::context::session::SessionError;
use crate::context::state::Routing;
use crate::types::{ConversationHistory, Turn};

/// The result of a handled question.
pub struct Answered<'a> {
    pub routing: Routing,
    pub reply: Reply<'a>,
}

pub enum Reply<'a> {
    /// Already committed to history.
    Complete(String),
    /// Committed to history once the stream is exhausted.
    Streaming(StreamingReply<'a>),
}

impl Reply<'_> {
    /// Drains a streaming reply; returns the full answer either way.
    pub async fn into_text(self) -> Result<String, SessionError> {
        match self {
            Reply::Complete(text) => Ok(text),
            Reply::Streaming(mut stream) => {
                let mut text = String::new();
                while let Some(fragment) = stream.next().await {
                    text.push_str(&fragment?);
                }
                Ok(text)
            }
        }
    }
}

/// Fragments of an answer as the generator produces them.
///
/// The full answer is buffered and pushed to the session history only when
/// the underlying stream ends cleanly. Dropping the reply early or hitting a
/// fragment error leaves the history untouched.
pub struct StreamingReply<'a> {
    fragments: FragmentStream,
    buffer: String,
    question: Option<String>,
    history: &'a mut ConversationHistory,
    committed: bool,
}

impl<'a> StreamingReply<'a> {
    pub(crate) fn new(
        question: String,
        fragments: FragmentStream,
        history: &'a mut ConversationHistory,
    ) -> Self {
        Self {
            fragments,
            buffer: String::new(),
            question: Some(question),
            history,
            committed: false,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl Stream for StreamingReply<'_> {
    type Item = Result<String, SessionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.question.is_none() {
            return Poll::Ready(None);
        }

        match this.fragments.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(fragment))) => {
                this.buffer.push_str(&fragment);
                Poll::Ready(Some(Ok(fragment)))
            }
            Poll::Ready(Some(Err(e))) => {
                warn!(error = %e, "answer stream failed; history not updated");
                this.question = None;
                this.buffer.clear();
                Poll::Ready(Some(Err(SessionError::Generation(e))))
            }
            Poll::Ready(None) => {
                if let Some(question) = this.question.take() {
                    let answer = std::mem::take(&mut this.buffer);
                    let evicted = this.history.push(Turn::new(question, answer));
                    this.committed = true;
                    debug!(
                        history = this.history.len(),
                        evicted = evicted.len(),
                        "streamed answer committed"
                    );
                }
                Poll::Ready(None)
            }
        }
    }
}
