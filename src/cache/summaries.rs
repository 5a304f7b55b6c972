// Built once per process, shared by every session, never rebuilt.
// Routing and selection only ever see this view of the corpus.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cache::assemble::render_summaries;
use crate::document::{DocumentId, DocumentVersion};

#[derive(Debug)]
pub struct SummaryIndex {
    entries: BTreeMap<DocumentId, String>,
    rendered: Arc<str>,
    fingerprint: DocumentVersion,
    created_at: DateTime<Utc>, // informational only
}

impl SummaryIndex {
    pub fn new(entries: BTreeMap<DocumentId, String>, created_at: DateTime<Utc>) -> Self {
        let rendered: Arc<str> = render_summaries(&entries).into();
        let fingerprint = DocumentVersion::from_content(rendered.as_bytes());
        Self {
            entries,
            rendered,
            fingerprint,
            created_at,
        }
    }

    pub fn summary_of(&self, id: &DocumentId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn all_summaries(&self) -> &BTreeMap<DocumentId, String> {
        &self.entries
    }

    /// Summaries of the given identities; unknown identities are skipped.
    pub fn subset<'a>(&'a self, ids: &'a [DocumentId]) -> BTreeMap<&'a DocumentId, &'a str> {
        ids.iter()
            .filter_map(|id| self.summary_of(id).map(|s| (id, s)))
            .collect()
    }

    /// All summaries as one delimited text, rendered at construction.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn fingerprint(&self) -> &DocumentVersion {
        &self.fingerprint
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
