use serde::Serialize;

use crate::cache::ContentCacheHandle;
use crate::document::DocumentId;

/// The loaded documents and the handle built from them.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    documents: Vec<DocumentId>,
    handle: ContentCacheHandle,
}

impl WorkingSet {
    /// `documents` must already be sorted, deduplicated and capped.
    pub(crate) fn new(documents: Vec<DocumentId>, handle: ContentCacheHandle) -> Self {
        debug_assert!(documents.windows(2).all(|w| w[0] < w[1]));
        Self { documents, handle }
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn handle(&self) -> &ContentCacheHandle {
        &self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub enum ContextState {
    #[default]
    Empty,
    Loaded(WorkingSet),
}

impl ContextState {
    pub fn working_set(&self) -> Option<&WorkingSet> {
        match self {
            ContextState::Empty => None,
            ContextState::Loaded(ws) => Some(ws),
        }
    }

    pub fn active_documents(&self) -> &[DocumentId] {
        match self.working_set() {
            Some(ws) => ws.documents(),
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ContextState::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadReason {
    /// Nothing loaded, or the loaded set holds no documents.
    EmptyContext,
    /// The oracle asked for new context.
    Requested,
    /// The oracle's answer was unusable.
    Fallback,
    /// The handle expired.
    Expired,
}

/// How a question was routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Routing {
    Reused {
        generation: u64,
    },
    Reloaded {
        reason: ReloadReason,
        generation: u64,
        documents: Vec<DocumentId>,
    },
    Retained {
        reason: ReloadReason,
        generation: u64,
    },
}

impl Routing {
    pub fn generation(&self) -> u64 {
        match self {
            Routing::Reused { generation }
            | Routing::Reloaded { generation, .. }
            | Routing::Retained { generation, .. } => *generation,
        }
    }

    pub fn is_reload(&self) -> bool {
        matches!(self, Routing::Reloaded { .. })
    }
}
