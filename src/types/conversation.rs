use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Bounded conversation window.
///
/// Holds at most `capacity` turns. Pushing past the bound evicts the oldest
/// turn first. A capacity of zero keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a turn and returns the evicted turns, oldest first.
    pub fn push(&mut self, turn: Turn) -> Vec<Turn> {
        self.turns.push_back(turn);
        let mut evicted = Vec::new();
        while self.turns.len() > self.capacity {
            if let Some(oldest) = self.turns.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Plain-text transcript of the window, one `Previous user:` /
    /// `Previous assistant:` line per message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str("Previous user: ");
            out.push_str(&turn.question);
            out.push('\n');
            out.push_str("Previous assistant: ");
            out.push_str(&turn.answer);
            out.push('\n');
        }
        out
    }
}
