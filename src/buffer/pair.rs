use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::{BufferError, TextKind};

fn non_blank(text: impl Into<String>, kind: TextKind) -> Result<String, BufferError> {
    let text = text.into();
    if text.trim().is_empty() {
        return Err(BufferError::InvalidInput(kind));
    }
    Ok(text)
}

/// A user prompt and the order in which the buffer accepted it (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    text: String,
    order: u64,
}

impl Prompt {
    pub(crate) fn new(text: impl Into<String>, order: u64) -> Result<Self, BufferError> {
        Ok(Self {
            text: non_blank(text, TextKind::Prompt)?,
            order,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn order(&self) -> u64 {
        self.order
    }
}

/// A candidate assistant response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Response {
    text: String,
}

impl Response {
    pub fn new(text: impl Into<String>) -> Result<Self, BufferError> {
        Ok(Self {
            text: non_blank(text, TextKind::Response)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A committed prompt/response pair. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedPair {
    prompt: Prompt,
    response: Response,
    sequence_index: u64,
    finalized_at: DateTime<Utc>,
}

impl FinalizedPair {
    pub(crate) fn new(prompt: Prompt, response: Response, sequence_index: u64) -> Self {
        Self {
            prompt,
            response,
            sequence_index,
            finalized_at: Utc::now(),
        }
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Position in the whole conversation, counting pairs that were since evicted.
    pub fn sequence_index(&self) -> u64 {
        self.sequence_index
    }

    pub fn finalized_at(&self) -> DateTime<Utc> {
        self.finalized_at
    }
}
