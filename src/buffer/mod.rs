//! The conversation buffer: a window of at most `K` finalized prompt/response
//! pairs plus one editable turn.
//!
//! A turn starts with [`ConversationBuffer::add_prompt`]. Candidate responses
//! are pushed onto a stack so that [`ConversationBuffer::undo`] always reverts
//! the latest one, and [`ConversationBuffer::finalize`] commits whichever
//! response is on top. Committed pairs live in a [`BoundedQueue`] that drops
//! the oldest pair once the window is full.
//!
//! The buffer never prints or logs; callers render the values it returns.

pub mod bounded_queue;
pub mod error;
pub mod pair;
pub mod stack;
pub mod status;

#[cfg(test)]
mod proptests;

use std::collections::vec_deque;
use std::num::NonZeroUsize;

pub use bounded_queue::BoundedQueue;
pub use error::{BufferError, TextKind};
pub use pair::{FinalizedPair, Prompt, Response};
pub use stack::{EmptyStack, Stack};
pub use status::{BufferState, BufferStatus, PendingTurn, Snapshot};

/// The uncommitted part of the conversation. A response stack only exists
/// alongside its prompt.
#[derive(Debug, Clone, Default)]
enum Turn {
    #[default]
    Idle,
    Active {
        prompt: Prompt,
        responses: Stack<Response>,
    },
}

impl Turn {
    fn into_prompt(self) -> Option<Prompt> {
        match self {
            Turn::Idle => None,
            Turn::Active { prompt, .. } => Some(prompt),
        }
    }
}

/// Result of a successful [`ConversationBuffer::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub pair: FinalizedPair,
    /// The oldest pair, if committing this one pushed it out of the window.
    pub evicted: Option<FinalizedPair>,
}

/// How [`ConversationBuffer::add_prompt`] resolved the turn it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// There was no current prompt.
    Started,
    /// The previous prompt never got a response and was dropped.
    Discarded(Prompt),
    /// The previous prompt's top response was committed first.
    AutoFinalized(Finalized),
}

#[derive(Debug, Clone)]
pub struct ConversationBuffer {
    turn: Turn,
    finalized_pairs: BoundedQueue<FinalizedPair>,
    total_finalized: u64,
    total_prompts: u64,
}

impl ConversationBuffer {
    pub fn new(context_window_size: NonZeroUsize) -> Self {
        Self {
            turn: Turn::Idle,
            finalized_pairs: BoundedQueue::new(context_window_size),
            total_finalized: 0,
            total_prompts: 0,
        }
    }

    pub fn context_window_size(&self) -> usize {
        self.finalized_pairs.capacity()
    }

    pub fn state(&self) -> BufferState {
        match &self.turn {
            Turn::Idle => BufferState::Idle,
            Turn::Active { responses, .. } if responses.is_empty() => BufferState::AwaitingResponse,
            Turn::Active { .. } => BufferState::HasResponse,
        }
    }

    pub fn current_prompt(&self) -> Option<&Prompt> {
        match &self.turn {
            Turn::Idle => None,
            Turn::Active { prompt, .. } => Some(prompt),
        }
    }

    /// The response that [`finalize`](Self::finalize) would commit right now.
    pub fn top_response(&self) -> Option<&Response> {
        match &self.turn {
            Turn::Idle => None,
            Turn::Active { responses, .. } => responses.peek().ok(),
        }
    }

    pub fn response_stack_depth(&self) -> usize {
        match &self.turn {
            Turn::Idle => 0,
            Turn::Active { responses, .. } => responses.size(),
        }
    }

    /// Start a new turn with `text` as the current prompt.
    ///
    /// A pending turn is resolved first: if it has a response, that response is
    /// committed as if [`finalize`](Self::finalize) had been called; if it has
    /// none, its prompt is dropped without creating a pair.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidInput`] if `text` is blank. The pending turn is left
    /// as it was.
    pub fn add_prompt(&mut self, text: impl Into<String>) -> Result<PromptOutcome, BufferError> {
        let prompt = Prompt::new(text, self.total_prompts + 1)?;

        let outcome = match self.state() {
            BufferState::Idle => PromptOutcome::Started,
            BufferState::AwaitingResponse => std::mem::take(&mut self.turn)
                .into_prompt()
                .map_or(PromptOutcome::Started, PromptOutcome::Discarded),
            BufferState::HasResponse => PromptOutcome::AutoFinalized(self.finalize()?),
        };

        self.total_prompts += 1;
        self.turn = Turn::Active {
            prompt,
            responses: Stack::new(),
        };
        Ok(outcome)
    }

    /// Push a candidate response for the current prompt.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoActivePrompt`] when there is no current prompt, checked
    /// before [`BufferError::InvalidInput`] for blank text.
    pub fn add_response(&mut self, text: impl Into<String>) -> Result<(), BufferError> {
        let Turn::Active { responses, .. } = &mut self.turn else {
            return Err(BufferError::NoActivePrompt);
        };
        responses.push(Response::new(text)?);
        Ok(())
    }

    /// Pop and return the most recent candidate response.
    ///
    /// # Errors
    ///
    /// [`BufferError::EmptyStack`] if there is no response to undo.
    pub fn undo(&mut self) -> Result<Response, BufferError> {
        match &mut self.turn {
            Turn::Idle => Err(BufferError::EmptyStack),
            Turn::Active { responses, .. } => Ok(responses.pop()?),
        }
    }

    /// Commit the top response with the current prompt and return to idle.
    ///
    /// Responses below the top of the stack are dropped. If the window is
    /// already full the oldest pair is evicted and returned in
    /// [`Finalized::evicted`].
    ///
    /// # Errors
    ///
    /// [`BufferError::NothingToFinalize`] unless the buffer is in
    /// [`BufferState::HasResponse`].
    pub fn finalize(&mut self) -> Result<Finalized, BufferError> {
        match std::mem::take(&mut self.turn) {
            Turn::Idle => Err(BufferError::NothingToFinalize),
            Turn::Active {
                prompt,
                mut responses,
            } => match responses.pop() {
                Ok(top) => Ok(self.commit(prompt, top)),
                Err(EmptyStack) => {
                    self.turn = Turn::Active { prompt, responses };
                    Err(BufferError::NothingToFinalize)
                }
            },
        }
    }

    /// Finalized pairs, oldest first.
    pub fn history(&self) -> vec_deque::Iter<'_, FinalizedPair> {
        self.finalized_pairs.all_in_order()
    }

    fn commit(&mut self, prompt: Prompt, response: Response) -> Finalized {
        self.total_finalized += 1;
        let pair = FinalizedPair::new(prompt, response, self.total_finalized);
        let evicted = self.finalized_pairs.append(pair.clone());
        Finalized { pair, evicted }
    }
}
