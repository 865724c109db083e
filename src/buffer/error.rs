use thiserror::Error;

use super::stack::EmptyStack;

/// Errors returned by [`ConversationBuffer`](super::ConversationBuffer) operations.
///
/// Every variant is recoverable: the failing operation leaves the buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("{0} text cannot be empty")]
    InvalidInput(TextKind),
    #[error("No current prompt. Add a prompt first.")]
    NoActivePrompt,
    #[error("Nothing to undo")]
    EmptyStack,
    #[error("Nothing to finalize: the current prompt has no response")]
    NothingToFinalize,
}

impl From<EmptyStack> for BufferError {
    fn from(_: EmptyStack) -> Self {
        BufferError::EmptyStack
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Prompt,
    Response,
}

impl std::fmt::Display for TextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextKind::Prompt => write!(f, "Prompt"),
            TextKind::Response => write!(f, "Response"),
        }
    }
}
