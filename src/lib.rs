//! Dynamic working-set context cache for question answering over
//! legislative transcripts and bills.
//!
//! `hansard-context` decides, per question, whether the documents already
//! loaded for an answering service still suffice or must be swapped out. The
//! corpus index and summary index are built once and shared read-only; each
//! [`context::ContextSession`] owns its working set, its time-limited content
//! cache handle and a bounded conversation history. The language service is
//! reached only through the traits in [`capability`].

pub mod cache;
pub mod capability;
pub mod config;
pub mod context;
pub mod corpus;
pub mod document;
pub mod selection;
pub mod telemetry;
pub mod types;
