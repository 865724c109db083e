//! Read-only views derived from a [`ConversationBuffer`].

use serde::Serialize;

use super::pair::{FinalizedPair, Prompt, Response};
use super::{ConversationBuffer, Turn};

/// Where the buffer is in its prompt/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    /// No current prompt.
    Idle,
    /// A prompt is current but has no response yet.
    AwaitingResponse,
    /// A prompt is current and at least one response is on the stack.
    HasResponse,
}

impl std::fmt::Display for BufferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferState::Idle => write!(f, "idle"),
            BufferState::AwaitingResponse => write!(f, "awaiting response"),
            BufferState::HasResponse => write!(f, "has response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferStatus {
    pub state: BufferState,
    pub current_prompt: Option<String>,
    pub response_stack_depth: usize,
    pub finalized_count: usize,
    pub window_capacity: usize,
    /// The next finalize will evict the oldest pair.
    pub window_full: bool,
    pub total_finalized: u64,
    pub total_prompts: u64,
}

impl BufferStatus {
    /// Fraction of the context window currently occupied, in `0.0..=1.0`.
    pub fn window_utilization(&self) -> f64 {
        self.finalized_count as f64 / self.window_capacity as f64
    }
}

/// The current prompt together with its candidate responses, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTurn {
    pub prompt: Prompt,
    pub candidates: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub status: BufferStatus,
    pub window_utilization: f64,
    pub pairs: Vec<FinalizedPair>,
    pub pending: Option<PendingTurn>,
}

impl ConversationBuffer {
    pub fn get_status(&self) -> BufferStatus {
        BufferStatus {
            state: self.state(),
            current_prompt: self.current_prompt().map(|p| p.text().to_string()),
            response_stack_depth: self.response_stack_depth(),
            finalized_count: self.finalized_pairs.len(),
            window_capacity: self.finalized_pairs.capacity(),
            window_full: self.finalized_pairs.is_full(),
            total_finalized: self.total_finalized,
            total_prompts: self.total_prompts,
        }
    }

    /// Everything a display layer needs to render the conversation.
    pub fn snapshot(&self) -> Snapshot {
        let status = self.get_status();
        let pending = match &self.turn {
            Turn::Idle => None,
            Turn::Active { prompt, responses } => Some(PendingTurn {
                prompt: prompt.clone(),
                candidates: responses.iter().rev().cloned().collect(),
            }),
        };

        Snapshot {
            window_utilization: status.window_utilization(),
            status,
            pairs: self.history().cloned().collect(),
            pending,
        }
    }
}
