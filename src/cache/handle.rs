// This is intentionally thin:
// no mutation
// no refresh or sliding expiry
// an expired handle is replaced, never extended

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::document::DocumentVersion;

/// Time-limited reference to an assembled context held for the answer generator.
#[derive(Debug, Clone)]
pub struct ContentCacheHandle {
    generation: u64,
    fingerprint: DocumentVersion,
    context: Arc<str>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ContentCacheHandle {
    pub fn new(
        generation: u64,
        context: String,
        created_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        let fingerprint = DocumentVersion::from_content(context.as_bytes());
        Self {
            generation,
            fingerprint,
            context: context.into(),
            created_at,
            expires_at: created_at + ttl,
        }
    }

    /// Per-session sequence number; every rebuild gets a new one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Content hash of the assembled context. Equal document sets give equal
    /// fingerprints across rebuilds.
    pub fn fingerprint(&self) -> &DocumentVersion {
        &self.fingerprint
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn shared_context(&self) -> Arc<str> {
        Arc::clone(&self.context)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}
