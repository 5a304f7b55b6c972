//! Contracts for the external language-understanding service.
//!
//! The session reaches the service only through three async traits:
//! [`RelevanceOracle`], [`DocumentSelector`] and [`AnswerGenerator`]. These
//! calls are the only suspension points in a question's lifecycle, and all
//! three go through [`with_timeout`] with the same limit.

pub mod generator;
pub mod relevance;
pub mod selector;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use generator::{Answer, AnswerGenerator, FragmentStream, GenerationRequest};
pub use relevance::{parse_relevance, RelevanceOracle, RelevanceRequest, RelevanceSignal};
pub use selector::{parse_document_ids, DocumentSelector, SelectionRequest};

/// Errors raised at the capability boundary.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The service could not be reached or failed mid-call.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The call did not finish within the configured limit.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered, but not with anything usable.
    #[error("unusable response: {0}")]
    InvalidResponse(String),
}

impl CapabilityError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    pub fn invalid_response(detail: impl Into<String>) -> Self {
        Self::InvalidResponse(detail.into())
    }
}

/// Runs a capability call under an optional deadline.
pub async fn with_timeout<T, F>(limit: Option<Duration>, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| CapabilityError::Timeout(limit))?,
        None => call.await,
    }
}
