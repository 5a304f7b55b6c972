#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hansard_context::capability::{
    Answer, AnswerGenerator, CapabilityError, DocumentSelector, GenerationRequest,
    RelevanceOracle, RelevanceRequest, RelevanceSignal, SelectionRequest,
};
use hansard_context::config::SessionConfig;
use hansard_context::context::{Capabilities, ContextSession, ManualClock};
use hansard_context::corpus::Corpus;
use hansard_context::document::DocumentId;

pub const DOCUMENTS_JSON: &str = r#"{
    "transcript 2024-10-21": {"type": "transcript", "id_number": "2024-10-21", "contents": "Question period on hospital wait times."},
    "transcript 2024-10-22": {"type": "transcript", "id_number": "2024-10-22", "contents": "Debate on Bill 212 and highway 413."},
    "transcript 2024-10-23": {"type": "transcript", "id_number": "2024-10-23", "contents": "Members' statements on housing starts."},
    "bill 9": {"type": "bill", "id_number": "9", "title": "Municipal Accountability Act", "sponsor": "A. Member", "contents": "Explanatory Note. Amends the Municipal Act."},
    "bill 212": {"type": "bill", "id_number": "212", "title": "Reducing Gridlock, Saving You Time Act", "status": "Royal Assent", "contents": "Explanatory Note. Bike lanes and Highway 413."}
}"#;

pub const SUMMARIES_JSON: &str = r#"{
    "transcript 2024-10-21": {"type": "transcript", "id_number": "2024-10-21", "summary": "2024-10-21 -- Speakers: [Ford, Stiles] | Topics: [health] | Bills: []"},
    "transcript 2024-10-22": {"type": "transcript", "id_number": "2024-10-22", "summary": "2024-10-22 -- Speakers: [Sarkaria] | Topics: [transit] | Bills: [212]"},
    "transcript 2024-10-23": {"type": "transcript", "id_number": "2024-10-23", "summary": "2024-10-23 -- Speakers: [Calandra] | Topics: [housing] | Bills: []"},
    "bill 9": {"type": "bill", "id_number": "9", "summary": "Amends the Municipal Act."},
    "bill 212": {"type": "bill", "id_number": "212", "summary": "Bike lanes and Highway 413."}
}"#;

pub fn corpus() -> Arc<Corpus> {
    Arc::new(
        Corpus::from_json_str(DOCUMENTS_JSON, "documents.json", SUMMARIES_JSON, "summaries.json")
            .unwrap(),
    )
}

pub fn id(s: &str) -> DocumentId {
    s.parse().unwrap()
}

pub fn ids(list: &[&str]) -> Vec<DocumentId> {
    list.iter().map(|s| id(s)).collect()
}

pub fn transport_error() -> CapabilityError {
    CapabilityError::transport("connection reset")
}

// -- Relevance oracle --

#[derive(Clone, Copy, Debug)]
pub enum OracleStep {
    Signal(RelevanceSignal),
    Unparseable,
    TransportFailure,
}

/// Plays back scripted answers, then repeats `default`.
pub struct ScriptedOracle {
    steps: Mutex<VecDeque<OracleStep>>,
    default: OracleStep,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn always(signal: RelevanceSignal) -> Self {
        Self::new(vec![], OracleStep::Signal(signal))
    }

    pub fn new(steps: Vec<OracleStep>, default: OracleStep) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            default,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, step: OracleStep) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelevanceOracle for ScriptedOracle {
    async fn classify(&self, _request: RelevanceRequest<'_>) -> Result<RelevanceSignal, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(self.default);
        match step {
            OracleStep::Signal(signal) => Ok(signal),
            OracleStep::Unparseable => Err(CapabilityError::invalid_response("maybe?")),
            OracleStep::TransportFailure => Err(transport_error()),
        }
    }
}

// -- Document selector --

pub struct ScriptedSelector {
    responses: Mutex<VecDeque<Option<Vec<DocumentId>>>>,
    default: Vec<DocumentId>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedSelector {
    pub fn always(documents: Vec<DocumentId>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default: documents,
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, documents: Vec<DocumentId>) {
        self.responses.lock().unwrap().push_back(Some(documents));
    }

    /// Next call fails with a transport error.
    pub fn push_failure(&self) {
        self.responses.lock().unwrap().push_back(None);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSelector for ScriptedSelector {
    async fn select(&self, _request: SelectionRequest<'_>) -> Result<Vec<DocumentId>, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.responses.lock().unwrap().pop_front() {
            Some(Some(documents)) => Ok(documents),
            Some(None) => Err(transport_error()),
            None => Ok(self.default.clone()),
        }
    }
}

// -- Answer generator --

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub question: String,
    pub history_len: usize,
    pub generation: u64,
    pub context: String,
}

/// Echoes the question, either whole or word by word as a stream.
pub struct EchoGenerator {
    seen: Mutex<Vec<SeenRequest>>,
    fail_next: Mutex<bool>,
    fail_mid_stream: bool,
}

impl EchoGenerator {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_next: Mutex::new(false),
            fail_mid_stream: false,
        }
    }

    pub fn failing_mid_stream() -> Self {
        Self {
            fail_mid_stream: true,
            ..Self::new()
        }
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl AnswerGenerator for EchoGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Answer, CapabilityError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(transport_error());
        }
        self.seen.lock().unwrap().push(SeenRequest {
            question: request.question.to_string(),
            history_len: request.history.len(),
            generation: request.handle.generation(),
            context: request.handle.context().to_string(),
        });

        let answer = format!("echo: {}", request.question);
        if !request.stream {
            return Ok(Answer::Complete(answer));
        }

        let mut fragments: Vec<Result<String, CapabilityError>> = answer
            .split_inclusive(' ')
            .map(|word| Ok(word.to_string()))
            .collect();
        if self.fail_mid_stream {
            fragments.insert(1, Err(transport_error()));
        }
        Ok(Answer::Stream(Box::pin(futures::stream::iter(fragments))))
    }
}

// -- Session wiring --

pub struct Harness {
    pub oracle: Arc<ScriptedOracle>,
    pub selector: Arc<ScriptedSelector>,
    pub generator: Arc<EchoGenerator>,
    pub clock: Arc<ManualClock>,
    pub session: ContextSession,
}

pub fn config() -> SessionConfig {
    SessionConfig {
        streaming: false,
        ..SessionConfig::default()
    }
}

pub fn harness(
    oracle: ScriptedOracle,
    selector: ScriptedSelector,
    generator: EchoGenerator,
    config: SessionConfig,
) -> Harness {
    let oracle = Arc::new(oracle);
    let selector = Arc::new(selector);
    let generator = Arc::new(generator);
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap()));

    let capabilities = Capabilities {
        oracle: oracle.clone(),
        selector: selector.clone(),
        generator: generator.clone(),
    };
    let session = ContextSession::new(corpus(), capabilities, config)
        .unwrap()
        .with_clock(clock.clone());

    Harness {
        oracle,
        selector,
        generator,
        clock,
        session,
    }
}
