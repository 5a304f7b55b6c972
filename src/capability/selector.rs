use async_trait::async_trait;

use crate::cache::SummaryIndex;
use crate::capability::CapabilityError;
use crate::document::DocumentId;

pub struct SelectionRequest<'a> {
    pub question: &'a str,
    pub summaries: &'a SummaryIndex,
    /// Earliest and latest transcript available.
    pub transcript_range: Option<(&'a DocumentId, &'a DocumentId)>,
    /// Lowest and highest bill available.
    pub bill_range: Option<(&'a DocumentId, &'a DocumentId)>,
    /// Advisory; the session enforces the cap on whatever comes back.
    pub max_documents: usize,
}

#[async_trait]
pub trait DocumentSelector: Send + Sync {
    /// Identities in priority order, highest first.
    async fn select(&self, request: SelectionRequest<'_>) -> Result<Vec<DocumentId>, CapabilityError>;
}

/// Parses line-oriented selector output, one identity per line.
///
/// Markdown bullets and emphasis are stripped; lines that do not read as an
/// identity are skipped.
pub fn parse_document_ids(text: &str) -> Vec<DocumentId> {
    text.lines()
        .map(|line| line.replace('*', ""))
        .filter_map(|line| {
            let line = line.trim().trim_start_matches('-').trim();
            if line.is_empty() {
                None
            } else {
                line.parse().ok()
            }
        })
        .collect()
}
