use std::collections::BTreeSet;

use crate::corpus::CorpusIndex;
use crate::document::{Document, DocumentId};

pub struct CapResult<'a> {
    /// Resolved documents in the selector's priority order.
    pub selected: Vec<&'a Document>,
    pub unknown: Vec<DocumentId>,
    pub duplicates: usize,
    pub excluded_by_cap: Vec<DocumentId>,
}

/// Enforces the document cap on a selector's output.
///
/// Unknown identities are dropped before the cap is applied so they never
/// take a slot; repeated identities count once.
pub fn apply_document_cap<'a>(
    candidates: Vec<DocumentId>,
    corpus: &'a CorpusIndex,
    cap: usize,
) -> CapResult<'a> {
    let mut selected = Vec::new();
    let mut unknown = Vec::new();
    let mut duplicates = 0;
    let mut excluded_by_cap = Vec::new();
    let mut seen = BTreeSet::new();

    for id in candidates {
        let Some(doc) = corpus.lookup(&id) else {
            unknown.push(id);
            continue;
        };
        if !seen.insert(id.clone()) {
            duplicates += 1;
            continue;
        }
        if selected.len() < cap {
            selected.push(doc);
        } else {
            excluded_by_cap.push(id);
        }
    }

    CapResult {
        selected,
        unknown,
        duplicates,
        excluded_by_cap,
    }
}
