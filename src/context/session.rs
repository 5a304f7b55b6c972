use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{assemble_context, ContentCacheHandle};
use crate::capability::{
    with_timeout, Answer, AnswerGenerator, CapabilityError, DocumentSelector, GenerationRequest,
    RelevanceOracle, RelevanceRequest, RelevanceSignal, SelectionRequest,
};
use crate::config::{ConfigError, ExpiryPolicy, SessionConfig};
use crate::context::clock::{Clock, SystemClock};
use crate::context::reply::{Answered, Reply, StreamingReply};
use crate::context::state::{ContextState, ReloadReason, Routing, WorkingSet};
use crate::context::stats::SessionStats;
use crate::corpus::Corpus;
use crate::document::{Document, DocumentId, DocumentKind};
use crate::selection::apply_document_cap;
use crate::types::{ConversationHistory, Turn};

pub const USER_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't answer that. Please try rephrasing your question.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("Relevance check failed: {0}")]
    Relevance(#[source] CapabilityError),
    #[error("Document selection failed: {0}")]
    Selection(#[source] CapabilityError),
    #[error("Answer generation failed: {0}")]
    Generation(#[source] CapabilityError),
}

impl SessionError {
    /// What the end user sees; cache internals stay in the logs.
    pub fn user_message(&self) -> &'static str {
        USER_FAILURE_MESSAGE
    }
}

/// The three external capabilities a session talks to.
#[derive(Clone)]
pub struct Capabilities {
    pub oracle: Arc<dyn RelevanceOracle>,
    pub selector: Arc<dyn DocumentSelector>,
    pub generator: Arc<dyn AnswerGenerator>,
}

enum Relevance {
    NoContext,
    Oracle(RelevanceSignal),
    Fallback,
}

/// One conversation over a shared corpus.
///
/// Owns the working set and the bounded history. Questions are handled one
/// at a time through `&mut self`; the corpus and summary index are shared
/// read-only with any other session.
pub struct ContextSession {
    corpus: Arc<Corpus>,
    capabilities: Capabilities,
    config: SessionConfig,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    state: ContextState,
    history: ConversationHistory,
    stats: SessionStats,
    next_generation: u64,
}

impl ContextSession {
    pub fn new(
        corpus: Arc<Corpus>,
        capabilities: Capabilities,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let ttl = config.cache_ttl_delta()?;
        let history = ConversationHistory::new(config.max_history);

        Ok(Self {
            corpus,
            capabilities,
            config,
            ttl,
            clock: Arc::new(SystemClock),
            state: ContextState::Empty,
            history,
            stats: SessionStats::default(),
            next_generation: 0,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Asks whether the active documents still answer `question`.
    ///
    /// An empty working set is never relevant and skips the oracle. An
    /// unusable oracle answer reads as [`RelevanceSignal::LoadNewContext`].
    pub async fn check_relevance(&self, question: &str) -> Result<RelevanceSignal, SessionError> {
        Ok(match self.assess(question).await? {
            Relevance::Oracle(signal) => signal,
            Relevance::NoContext | Relevance::Fallback => RelevanceSignal::LoadNewContext,
        })
    }

    async fn assess(&self, question: &str) -> Result<Relevance, SessionError> {
        let ws = match self.state.working_set() {
            Some(ws) if !ws.is_empty() => ws,
            _ => return Ok(Relevance::NoContext),
        };

        let request = RelevanceRequest {
            question,
            history: &self.history,
            active_summaries: self.corpus.summaries.subset(ws.documents()),
        };
        let outcome = with_timeout(
            self.config.capability_timeout,
            self.capabilities.oracle.classify(request),
        )
        .await;

        match outcome {
            Ok(signal) => Ok(Relevance::Oracle(signal)),
            Err(CapabilityError::InvalidResponse(detail)) => {
                warn!(%detail, "unusable relevance answer, reloading");
                Ok(Relevance::Fallback)
            }
            Err(e) => Err(SessionError::Relevance(e)),
        }
    }

    /// Answers one question, reloading the working set first if needed.
    ///
    /// On error the working set is whatever it was before the failing step;
    /// a reload is only committed once fully built.
    pub async fn handle_question(&mut self, question: &str) -> Result<Answered<'_>, SessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        self.stats.questions += 1;

        let (routing, handle) = match self.route(question).await {
            Ok(routed) => routed,
            Err(e) => {
                self.stats.failures += 1;
                warn!(error = %e, "question routing failed");
                return Err(e);
            }
        };
        if self.config.debug {
            info!(?routing, active = ?self.state.active_documents(), stats = ?self.stats, "routed");
        } else {
            debug!(?routing, "routed");
        }

        let request = GenerationRequest {
            question,
            history: &self.history,
            handle: &handle,
            stream: self.config.streaming,
        };
        let generated = with_timeout(
            self.config.capability_timeout,
            self.capabilities.generator.generate(request),
        )
        .await;

        let answer = match generated {
            Ok(answer) => answer,
            Err(e) => {
                self.stats.failures += 1;
                warn!(error = %e, "answer generation failed");
                return Err(SessionError::Generation(e));
            }
        };

        let reply = match answer {
            Answer::Complete(text) => {
                let evicted = self.history.push(Turn::new(question, text.clone()));
                debug!(history = self.history.len(), evicted = evicted.len(), "answer committed");
                Reply::Complete(text)
            }
            Answer::Stream(fragments) => Reply::Streaming(StreamingReply::new(
                question.to_string(),
                fragments,
                &mut self.history,
            )),
        };

        Ok(Answered { routing, reply })
    }

    async fn route(&mut self, question: &str) -> Result<(Routing, ContentCacheHandle), SessionError> {
        let relevance = self.assess(question).await?;
        let now = self.clock.now();

        let reason = match relevance {
            Relevance::NoContext => ReloadReason::EmptyContext,
            Relevance::Fallback => {
                self.stats.relevance_fallbacks += 1;
                ReloadReason::Fallback
            }
            Relevance::Oracle(RelevanceSignal::LoadNewContext) => ReloadReason::Requested,
            Relevance::Oracle(RelevanceSignal::UseCurrentContext) => match self.state.working_set() {
                Some(ws) if !ws.handle().is_expired(now) => {
                    let handle = ws.handle().clone();
                    self.stats.reused += 1;
                    return Ok((
                        Routing::Reused {
                            generation: handle.generation(),
                        },
                        handle,
                    ));
                }
                Some(ws) if self.config.expiry_policy == ExpiryPolicy::Refresh => {
                    let documents = ws.documents().to_vec();
                    self.stats.expired_refreshes += 1;
                    info!(documents = documents.len(), "content cache expired, refreshing same documents");
                    return Ok(self.commit(documents, ReloadReason::Expired));
                }
                _ => ReloadReason::Expired,
            },
        };

        let documents = self.select(question).await?;

        if let (Some(headroom), Some(ws)) = (self.config.reuse_headroom, self.state.working_set()) {
            let now = self.clock.now();
            let handle_live = !ws.handle().is_expired(now);
            if handle_live
                && ws.documents() == documents.as_slice()
                && ws.handle().remaining(now) >= headroom
            {
                let handle = ws.handle().clone();
                self.stats.retained += 1;
                debug!(generation = handle.generation(), "selection matches active set, keeping handle");
                return Ok((
                    Routing::Retained {
                        reason,
                        generation: handle.generation(),
                    },
                    handle,
                ));
            }
        }

        Ok(self.commit(documents, reason))
    }

    /// Runs the selector and returns a sorted, resolvable, capped identity list.
    async fn select(&mut self, question: &str) -> Result<Vec<DocumentId>, SessionError> {
        let corpus = Arc::clone(&self.corpus);
        let cap = self.config.max_context_documents;

        let request = SelectionRequest {
            question,
            summaries: &corpus.summaries,
            transcript_range: corpus.index.range(DocumentKind::Transcript),
            bill_range: corpus.index.range(DocumentKind::Bill),
            max_documents: cap,
        };
        let candidates = with_timeout(
            self.config.capability_timeout,
            self.capabilities.selector.select(request),
        )
        .await
        .map_err(SessionError::Selection)?;

        let returned = candidates.len();
        let capped = apply_document_cap(candidates, &corpus.index, cap);

        if !capped.unknown.is_empty() {
            warn!(unknown = ?capped.unknown, "selector returned unknown documents, dropping them");
        }
        if !capped.excluded_by_cap.is_empty() {
            warn!(
                returned,
                cap,
                excluded = ?capped.excluded_by_cap,
                "selector exceeded the document cap, truncating"
            );
        }
        self.stats.unknown_ids_dropped += capped.unknown.len() as u64;
        self.stats.duplicate_ids_dropped += capped.duplicates as u64;
        self.stats.excess_ids_truncated += capped.excluded_by_cap.len() as u64;

        let mut documents: Vec<DocumentId> =
            capped.selected.iter().map(|doc| doc.id.clone()).collect();

        if documents.is_empty() && self.config.fallback_recent_transcripts > 0 {
            let n = self.config.fallback_recent_transcripts.min(cap);
            documents = corpus
                .index
                .most_recent(DocumentKind::Transcript, n)
                .to_vec();
            info!(count = documents.len(), "no usable selection, falling back to recent transcripts");
        }
        if documents.is_empty() {
            self.stats.empty_selections += 1;
            warn!("no usable documents selected, continuing with an empty working set");
        }

        documents.sort();
        Ok(documents)
    }

    /// Builds a new working set and swaps it in whole.
    fn commit(&mut self, documents: Vec<DocumentId>, reason: ReloadReason) -> (Routing, ContentCacheHandle) {
        let corpus = Arc::clone(&self.corpus);
        let resolved: Vec<&Document> = documents
            .iter()
            .filter_map(|id| corpus.index.lookup(id))
            .collect();
        let context = assemble_context(resolved);

        let generation = self.next_generation;
        let handle = ContentCacheHandle::new(generation, context, self.clock.now(), self.ttl);

        self.next_generation += 1;
        self.stats.reloads += 1;
        self.stats.handles_created += 1;
        info!(
            generation,
            ?reason,
            documents = ?documents,
            expires_at = %handle.expires_at(),
            "content cache rebuilt"
        );

        self.state = ContextState::Loaded(WorkingSet::new(documents.clone(), handle.clone()));
        (
            Routing::Reloaded {
                reason,
                generation,
                documents,
            },
            handle,
        )
    }

    /// Ends the session, dropping the working set.
    pub fn close(self) -> SessionStats {
        info!(stats = ?self.stats, "session closed");
        self.stats
    }
}
