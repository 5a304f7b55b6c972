use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// The two document families held in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Transcript,
    #[serde(alias = "bills")]
    Bill,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Transcript => "transcript",
            DocumentKind::Bill => "bill",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transcript" => Ok(DocumentKind::Transcript),
            "bill" | "bills" => Ok(DocumentKind::Bill),
            other => Err(DocumentIdError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentIdError {
    #[error("Unknown document kind: {0}")]
    UnknownKind(String),
    #[error("Malformed document identity: {0:?}")]
    Malformed(String),
    #[error("Transcript key is not a YYYY-MM-DD date: {0}")]
    InvalidDate(String),
    #[error("Bill number must not be empty")]
    EmptyBillNumber,
}

/// Identity of a document: `(kind, key)`.
///
/// The key is a `YYYY-MM-DD` sitting date for transcripts and a bill number
/// for bills. The textual form is `"<kind> <key>"`, e.g. `"transcript 2024-10-21"`
/// or `"bill 212"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId {
    kind: DocumentKind,
    key: String,
}

impl DocumentId {
    pub fn new(kind: DocumentKind, key: impl Into<String>) -> Result<Self, DocumentIdError> {
        let key = key.into().trim().to_string();
        if key.contains(char::is_whitespace) {
            return Err(DocumentIdError::Malformed(format!("{kind} {key}")));
        }
        match kind {
            DocumentKind::Transcript => {
                NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                    .map_err(|_| DocumentIdError::InvalidDate(key.clone()))?;
            }
            DocumentKind::Bill => {
                if key.is_empty() {
                    return Err(DocumentIdError::EmptyBillNumber);
                }
            }
        }
        Ok(DocumentId { kind, key })
    }

    pub fn transcript(date: impl Into<String>) -> Result<Self, DocumentIdError> {
        Self::new(DocumentKind::Transcript, date)
    }

    pub fn bill(number: impl Into<String>) -> Result<Self, DocumentIdError> {
        Self::new(DocumentKind::Bill, number)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.key)
    }
}

impl FromStr for DocumentId {
    type Err = DocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (kind, key) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| DocumentIdError::Malformed(trimmed.to_string()))?;
        DocumentId::new(kind.parse()?, key)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}

impl Ord for DocumentId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| compare_keys(&self.key, &other.key))
    }
}

impl PartialOrd for DocumentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Bill numbers sort numerically; dates already sort lexicographically.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Content hash version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentVersion(String);

impl DocumentVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        DocumentVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
