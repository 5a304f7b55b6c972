use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::{DocumentId, DocumentVersion};
use super::metadata::Metadata;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document {0} has empty text")]
    EmptyText(DocumentId),
}

/// A transcript or bill with its full text. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub version: DocumentVersion,
    pub text: String,
    pub metadata: Metadata,
}

impl Document {
    /// Ingest a document's text.
    ///
    /// The version is the content hash of the text; metadata never affects it.
    pub fn ingest(
        id: DocumentId,
        text: String,
        metadata: Metadata,
    ) -> Result<Self, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyText(id));
        }

        let version = DocumentVersion::from_content(text.as_bytes());

        Ok(Document {
            id,
            version,
            text,
            metadata,
        })
    }
}
