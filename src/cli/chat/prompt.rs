use rustyline::{Config, Editor, Result};

use crate::buffer::{BufferState, BufferStatus};

/// Prompt showing window usage and whether the current turn is waiting on a response.
pub fn generate_prompt(status: &BufferStatus) -> String {
    let marker = match status.state {
        BufferState::Idle => ">",
        BufferState::AwaitingResponse => "?>",
        BufferState::HasResponse => "*>",
    };
    format!(
        "[{}/{}] {} ",
        status.finalized_count, status.window_capacity, marker
    )
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .build();
    Editor::with_config(config)
}
