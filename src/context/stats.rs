use serde::Serialize;

/// Routing and cache counters for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub questions: u64,
    /// Answered from the existing handle.
    pub reused: u64,
    /// Full rebuilds, including expiry refreshes.
    pub reloads: u64,
    pub expired_refreshes: u64,
    /// Reloads that selected the active set and kept its handle.
    pub retained: u64,
    pub handles_created: u64,
    pub relevance_fallbacks: u64,
    pub unknown_ids_dropped: u64,
    pub duplicate_ids_dropped: u64,
    pub excess_ids_truncated: u64,
    pub empty_selections: u64,
    pub failures: u64,
}
