use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityError;
use crate::document::DocumentId;
use crate::types::ConversationHistory;

/// Whether the active working set still answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelevanceSignal {
    UseCurrentContext,
    LoadNewContext,
}

impl RelevanceSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceSignal::UseCurrentContext => "USE_CURRENT_CONTEXT",
            RelevanceSignal::LoadNewContext => "LOAD_NEW_CONTEXT",
        }
    }
}

impl fmt::Display for RelevanceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: exactly one of the two tokens, surrounding whitespace ignored.
impl FromStr for RelevanceSignal {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "USE_CURRENT_CONTEXT" => Ok(RelevanceSignal::UseCurrentContext),
            "LOAD_NEW_CONTEXT" => Ok(RelevanceSignal::LoadNewContext),
            other => Err(CapabilityError::invalid_response(format!(
                "expected USE_CURRENT_CONTEXT or LOAD_NEW_CONTEXT, got {other:?}"
            ))),
        }
    }
}

/// Maps free text to a signal. Anything that is not exactly
/// `USE_CURRENT_CONTEXT` means reload.
pub fn parse_relevance(text: &str) -> RelevanceSignal {
    text.parse().unwrap_or(RelevanceSignal::LoadNewContext)
}

pub struct RelevanceRequest<'a> {
    pub question: &'a str,
    pub history: &'a ConversationHistory,
    /// Summaries of the active documents only; never full text.
    pub active_summaries: BTreeMap<&'a DocumentId, &'a str>,
}

#[async_trait]
pub trait RelevanceOracle: Send + Sync {
    /// Returning [`CapabilityError::InvalidResponse`] is treated as
    /// [`RelevanceSignal::LoadNewContext`]; other errors fail the question.
    async fn classify(&self, request: RelevanceRequest<'_>) -> Result<RelevanceSignal, CapabilityError>;
}
