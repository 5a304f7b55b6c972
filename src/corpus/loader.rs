use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::document::{Document, DocumentError, DocumentId, DocumentKind, Metadata};
use crate::types::identifiers::DocumentIdError;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed entry {entry:?} in {origin}: {source}")]
    MalformedEntry {
        origin: String,
        entry: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Entry {entry:?} has an invalid identity: {source}")]
    InvalidIdentity {
        entry: String,
        #[source]
        source: DocumentIdError,
    },
    #[error("Entry {entry:?} is keyed differently from its record identity {id}")]
    KeyMismatch { entry: String, id: DocumentId },
    #[error("Duplicate document identity: {0}")]
    DuplicateDocument(DocumentId),
    #[error("Duplicate summary for {0}")]
    DuplicateSummary(DocumentId),
    #[error("Summary for {0} has no matching document")]
    OrphanSummary(DocumentId),
    #[error("Document {0} has no summary")]
    MissingSummary(DocumentId),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A collection is either an object keyed by identity string or a plain list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCollection {
    Keyed(BTreeMap<String, Value>),
    Listed(Vec<Value>),
}

impl RawCollection {
    fn into_entries(self) -> Vec<(String, Option<String>, Value)> {
        match self {
            RawCollection::Keyed(map) => map
                .into_iter()
                .map(|(k, v)| (k.clone(), Some(k), v))
                .collect(),
            RawCollection::Listed(list) => list
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("#{i}"), None, v))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Number(u64),
}

impl RawKey {
    fn into_string(self) -> String {
        match self {
            RawKey::Text(s) => s,
            RawKey::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct DocumentRecord {
    #[serde(alias = "type")]
    kind: DocumentKind,
    #[serde(alias = "id_number")]
    key: RawKey,
    #[serde(alias = "contents")]
    text: String,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct SummaryRecord {
    #[serde(alias = "type")]
    kind: DocumentKind,
    #[serde(alias = "id_number")]
    key: RawKey,
    summary: String,
}

pub(crate) fn read_file(path: &Path) -> Result<String, CorpusError> {
    fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_collection(raw: &str, origin: &str) -> Result<RawCollection, CorpusError> {
    serde_json::from_str(raw).map_err(|source| CorpusError::Json {
        origin: origin.to_string(),
        source,
    })
}

fn resolve_identity(
    entry: &str,
    map_key: Option<&str>,
    kind: DocumentKind,
    key: RawKey,
) -> Result<DocumentId, CorpusError> {
    let id = DocumentId::new(kind, key.into_string()).map_err(|source| {
        CorpusError::InvalidIdentity {
            entry: entry.to_string(),
            source,
        }
    })?;

    // A map key that reads as an identity must agree with the record.
    if let Some(Ok(keyed)) = map_key.map(str::parse::<DocumentId>) {
        if keyed != id {
            return Err(CorpusError::KeyMismatch {
                entry: entry.to_string(),
                id,
            });
        }
    }
    Ok(id)
}

pub fn parse_documents(raw: &str, origin: &str) -> Result<Vec<Document>, CorpusError> {
    let mut documents = Vec::new();
    for (entry, map_key, value) in parse_collection(raw, origin)?.into_entries() {
        let record: DocumentRecord =
            serde_json::from_value(value).map_err(|source| CorpusError::MalformedEntry {
                origin: origin.to_string(),
                entry: entry.clone(),
                source,
            })?;

        let id = resolve_identity(&entry, map_key.as_deref(), record.kind, record.key)?;
        let metadata = Metadata::from_fields(record.extra);
        documents.push(Document::ingest(id, record.text, metadata)?);
    }
    Ok(documents)
}

pub fn parse_summaries(raw: &str, origin: &str) -> Result<Vec<(DocumentId, String)>, CorpusError> {
    let mut summaries = Vec::new();
    for (entry, map_key, value) in parse_collection(raw, origin)?.into_entries() {
        let record: SummaryRecord =
            serde_json::from_value(value).map_err(|source| CorpusError::MalformedEntry {
                origin: origin.to_string(),
                entry: entry.clone(),
                source,
            })?;

        let id = resolve_identity(&entry, map_key.as_deref(), record.kind, record.key)?;
        summaries.push((id, record.summary));
    }
    Ok(summaries)
}
