pub mod index;
pub mod loader;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::cache::SummaryIndex;
use crate::document::{Document, DocumentId, DocumentKind};

pub use index::CorpusIndex;
pub use loader::{parse_documents, parse_summaries, CorpusError};

/// The read-only startup data shared by every session: full documents and
/// their summary index.
#[derive(Debug)]
pub struct Corpus {
    pub index: CorpusIndex,
    pub summaries: SummaryIndex,
}

impl Corpus {
    pub fn load(documents_path: &Path, summaries_path: &Path) -> Result<Self, CorpusError> {
        let documents_raw = loader::read_file(documents_path)?;
        let summaries_raw = loader::read_file(summaries_path)?;
        Self::from_json_str(
            &documents_raw,
            &documents_path.display().to_string(),
            &summaries_raw,
            &summaries_path.display().to_string(),
        )
    }

    pub fn from_json_str(
        documents: &str,
        documents_origin: &str,
        summaries: &str,
        summaries_origin: &str,
    ) -> Result<Self, CorpusError> {
        let documents = parse_documents(documents, documents_origin)?;
        let summaries = parse_summaries(summaries, summaries_origin)?;
        Self::from_parts(documents, summaries, Utc::now())
    }

    /// Every document must have exactly one summary and every summary a document.
    ///
    /// `loaded_at` stamps the summary index.
    pub fn from_parts(
        documents: Vec<Document>,
        summaries: Vec<(DocumentId, String)>,
        loaded_at: DateTime<Utc>,
    ) -> Result<Self, CorpusError> {
        let index = CorpusIndex::build(documents)?;

        let mut entries = BTreeMap::new();
        for (id, summary) in summaries {
            if !index.contains(&id) {
                return Err(CorpusError::OrphanSummary(id));
            }
            if entries.contains_key(&id) {
                return Err(CorpusError::DuplicateSummary(id));
            }
            entries.insert(id, summary);
        }
        if let Some(doc) = index.iter().find(|doc| !entries.contains_key(&doc.id)) {
            return Err(CorpusError::MissingSummary(doc.id.clone()));
        }

        info!(
            documents = index.len(),
            transcripts = index.list_sorted(DocumentKind::Transcript).len(),
            bills = index.list_sorted(DocumentKind::Bill).len(),
            "corpus loaded"
        );

        Ok(Self {
            index,
            summaries: SummaryIndex::new(entries, loaded_at),
        })
    }
}
