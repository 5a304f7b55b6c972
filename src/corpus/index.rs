use std::collections::BTreeMap;

use crate::corpus::CorpusError;
use crate::document::{Document, DocumentId, DocumentKind};

/// Immutable mapping from identity to document, plus per-kind sorted keys.
///
/// Built once at startup; there are no mutating methods.
#[derive(Debug)]
pub struct CorpusIndex {
    documents: BTreeMap<DocumentId, Document>,
    transcripts: Vec<DocumentId>,
    bills: Vec<DocumentId>,
}

impl CorpusIndex {
    pub fn build(documents: Vec<Document>) -> Result<Self, CorpusError> {
        let mut by_id = BTreeMap::new();
        for doc in documents {
            if by_id.contains_key(&doc.id) {
                return Err(CorpusError::DuplicateDocument(doc.id));
            }
            by_id.insert(doc.id.clone(), doc);
        }

        // BTreeMap iteration is already ascending by identity
        let (transcripts, bills): (Vec<DocumentId>, Vec<DocumentId>) = by_id
            .keys()
            .cloned()
            .partition(|id| id.kind() == DocumentKind::Transcript);

        Ok(Self {
            documents: by_id,
            transcripts,
            bills,
        })
    }

    pub fn lookup(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    /// Identities of one kind: transcripts ascending by date, bills ascending by number.
    pub fn list_sorted(&self, kind: DocumentKind) -> &[DocumentId] {
        match kind {
            DocumentKind::Transcript => &self.transcripts,
            DocumentKind::Bill => &self.bills,
        }
    }

    /// First and last identity of a kind, if any exist.
    pub fn range(&self, kind: DocumentKind) -> Option<(&DocumentId, &DocumentId)> {
        let ids = self.list_sorted(kind);
        Some((ids.first()?, ids.last()?))
    }

    /// The `n` highest-keyed identities of a kind, still in ascending order.
    pub fn most_recent(&self, kind: DocumentKind, n: usize) -> &[DocumentId] {
        let ids = self.list_sorted(kind);
        &ids[ids.len().saturating_sub(n)..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
