use std::num::NonZeroUsize;

/// One line of user input, mapped onto a buffer operation or a session action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPrompt(String),
    AddResponse(String),
    Undo,
    Finalize,
    History,
    Status,
    /// Start over with a fresh buffer, optionally with a different window size.
    Reset(Option<NonZeroUsize>),
    /// Play the healthy-salad walkthrough against the current buffer.
    Demo,
    Help,
    Quit,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddPrompt(_) => "ADD_PROMPT",
            Command::AddResponse(_) => "ADD_RESPONSE",
            Command::Undo => "UNDO",
            Command::Finalize => "FINALIZE",
            Command::History => "HISTORY",
            Command::Status => "STATUS",
            Command::Reset(_) => "RESET",
            Command::Demo => "DEMO",
            Command::Help => "HELP",
            Command::Quit => "QUIT",
        }
    }
}
