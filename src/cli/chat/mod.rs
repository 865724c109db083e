pub mod command;
pub mod display;
pub mod parser;
pub mod prompt;

use std::io::Write;
use std::num::NonZeroUsize;
use std::ops::ControlFlow;
use std::process::ExitCode;

use command::Command;
use crossterm::style::Color;
use display::Theme;
use eyre::{Result, WrapErr};
use parser::parse_command;
use prompt::generate_prompt;
use rustyline::error::ReadlineError;
use tracing::{debug, error, info};

use crate::buffer::{BufferError, ConversationBuffer, Finalized, PromptOutcome};

/// Expands a banner through a color-print macro: `cstr` keeps the colors,
/// `untagged` strips the tags.
macro_rules! welcome_text {
    ($render:ident) => {
        color_print::$render!(
            "
<bold>Conversation Buffer</bold>

Add a prompt, try out responses, undo the ones you don't like and
finalize the one you keep. Only the last K finalized pairs are kept.

<dim>HELP</dim>          Show the command list
<dim>DEMO</dim>          Walk through an example
<dim>QUIT</dim>          Quit the application
"
        )
    };
}

const WELCOME_TEXT: &str = welcome_text!(cstr);
const WELCOME_TEXT_PLAIN: &str = welcome_text!(untagged);

macro_rules! help_text {
    ($render:ident) => {
        color_print::$render!(
            "
<bold>Commands</bold> (case-insensitive, a leading / is accepted)

<cyan>ADD_PROMPT</cyan> <i>text</i>      Start a new prompt
<cyan>ADD_RESPONSE</cyan> <i>text</i>    Add a candidate response to the current prompt
<cyan>UNDO</cyan>                 Remove the most recent response
<cyan>FINALIZE</cyan>             Lock in the current prompt and its latest response
<cyan>HISTORY</cyan>              Show the context window and the pending prompt
<cyan>STATUS</cyan>               Show buffer status
<cyan>RESET</cyan> [K]            Start over, optionally with a new window size
<cyan>DEMO</cyan>                 Run the healthy salad walkthrough
<cyan>HELP</cyan>                 Show this help
<cyan>QUIT</cyan>                 Quit the application

Starting a new prompt while a response is pending finalizes it first.
A prompt that never got a response is dropped.
"
        )
    };
}

const HELP_TEXT: &str = help_text!(cstr);
const HELP_TEXT_PLAIN: &str = help_text!(untagged);

/// The healthy recipe walkthrough: a rejected response, an undo, a better
/// response and a finalize.
const DEMO_SCRIPT: &[&str] = &[
    "ADD_PROMPT Suggest a healthy salad",
    "ADD_RESPONSE Caesar salad with croutons",
    "UNDO",
    "ADD_RESPONSE Kale salad with lemon dressing",
    "FINALIZE",
    "HISTORY",
];

/// A single interactive or scripted session. Owns exactly one buffer.
pub struct ChatContext {
    output: Box<dyn Write>,
    inputs: Vec<String>,
    interactive: bool,
    json: bool,
    theme: Theme,
    window_size: NonZeroUsize,
    buffer: ConversationBuffer,
    failed_commands: usize,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        inputs: Vec<String>,
        window_size: NonZeroUsize,
        json: bool,
        theme: Theme,
    ) -> Self {
        Self {
            output,
            interactive: inputs.is_empty(),
            inputs,
            json,
            theme,
            window_size,
            buffer: ConversationBuffer::new(window_size),
            failed_commands: 0,
        }
    }

    pub fn run(&mut self) -> Result<ExitCode> {
        info!(
            window_size = self.buffer.context_window_size(),
            interactive = self.interactive,
            "Starting conversation session"
        );

        if self.interactive {
            self.print_welcome()?;
            self.run_interactive()?;
            return Ok(ExitCode::SUCCESS);
        }

        // Non-interactive mode: run the given commands in order
        for line in std::mem::take(&mut self.inputs) {
            if self.handle_input(&line)?.is_break() {
                break;
            }
        }

        if self.failed_commands > 0 {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            self.theme.banner(WELCOME_TEXT, WELCOME_TEXT_PLAIN)
        )?;
        writeln!(
            self.output,
            "Context window size set to {}",
            self.buffer.context_window_size()
        )?;
        Ok(())
    }

    fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl().wrap_err("Failed to initialize line editor")?;

        loop {
            let prompt_text = generate_prompt(&self.buffer.get_status());
            match rl.readline(&prompt_text) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    if self.handle_input(&line)?.is_break() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Parse and execute one line. Only output failures are returned as errors;
    /// bad commands and rejected buffer operations are reported and the session
    /// carries on.
    pub fn handle_input(&mut self, line: &str) -> Result<ControlFlow<()>> {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => {
                self.failed_commands += 1;
                display::write_error(&mut self.output, self.theme, e)?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<ControlFlow<()>> {
        debug!(command = command.name(), state = %self.buffer.state(), "Executing command");

        match command {
            Command::AddPrompt(text) => {
                let result = self.buffer.add_prompt(text);
                self.render(result, Self::report_prompt_outcome)?;
            }
            Command::AddResponse(text) => {
                let result = self.buffer.add_response(text);
                self.render(result, |chat, ()| chat.report_response())?;
            }
            Command::Undo => {
                let result = self.buffer.undo();
                self.render(result, |chat, undone| {
                    writeln!(chat.output, "Undone: '{}'", undone.text())?;
                    Ok(())
                })?;
            }
            Command::Finalize => {
                let result = self.buffer.finalize();
                self.render(result, |chat, finalized| {
                    chat.report_finalized("Finalized:", &finalized)
                })?;
            }
            Command::History => self.show_history()?,
            Command::Status => self.show_status()?,
            Command::Reset(window_size) => self.reset(window_size)?,
            Command::Demo => self.run_demo()?,
            Command::Help => writeln!(
                self.output,
                "{}",
                self.theme.banner(HELP_TEXT, HELP_TEXT_PLAIN)
            )?,
            Command::Quit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Report a buffer operation: `report` on success, an error line otherwise.
    fn render<T, F>(&mut self, result: Result<T, BufferError>, report: F) -> Result<()>
    where
        F: FnOnce(&mut Self, T) -> Result<()>,
    {
        match result {
            Ok(value) => report(self, value),
            Err(e) => {
                debug!(error = %e, "Command rejected");
                self.failed_commands += 1;
                display::write_error(&mut self.output, self.theme, e)?;
                Ok(())
            }
        }
    }

    fn report_prompt_outcome(&mut self, outcome: PromptOutcome) -> Result<()> {
        match outcome {
            PromptOutcome::Started => {}
            PromptOutcome::Discarded(prompt) => {
                info!(order = prompt.order(), "Discarded prompt without a response");
                writeln!(
                    self.output,
                    "{} '{}'",
                    self.theme.paint("Discarded unanswered prompt:", Color::Yellow),
                    prompt.text()
                )?;
            }
            PromptOutcome::AutoFinalized(finalized) => {
                info!(
                    sequence_index = finalized.pair.sequence_index(),
                    "Auto-finalized pending response"
                );
                let label = self.theme.paint("Auto-finalized:", Color::Yellow);
                self.report_finalized(&label, &finalized)?;
            }
        }

        if let Some(prompt) = self.buffer.current_prompt() {
            writeln!(self.output, "Prompt added: '{}'", prompt.text())?;
        }
        Ok(())
    }

    fn report_response(&mut self) -> Result<()> {
        if let Some(response) = self.buffer.top_response() {
            writeln!(self.output, "Response added: '{}'", response.text())?;
        }
        Ok(())
    }

    /// `label` tells an explicit finalize apart from one triggered by a new prompt.
    fn report_finalized(&mut self, label: &str, finalized: &Finalized) -> Result<()> {
        writeln!(
            self.output,
            "{} '{}' -> '{}'",
            label,
            finalized.pair.prompt().text(),
            finalized.pair.response().text()
        )?;

        if let Some(evicted) = &finalized.evicted {
            info!(
                sequence_index = evicted.sequence_index(),
                "Evicted oldest pair from context window"
            );
            writeln!(
                self.output,
                "{} #{} '{}'",
                self.theme.paint("Evicted from context window:", Color::DarkGrey),
                evicted.sequence_index(),
                evicted.prompt().text()
            )?;
        }
        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        let snapshot = self.buffer.snapshot();
        if self.json {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&snapshot)?)?;
        } else {
            display::write_history(&mut self.output, self.theme, &snapshot)?;
        }
        Ok(())
    }

    fn show_status(&mut self) -> Result<()> {
        let status = self.buffer.get_status();
        if self.json {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&status)?)?;
        } else {
            display::write_status(&mut self.output, self.theme, &status)?;
        }
        Ok(())
    }

    fn reset(&mut self, window_size: Option<NonZeroUsize>) -> Result<()> {
        let window_size = window_size.unwrap_or(self.window_size);
        self.window_size = window_size;
        self.buffer = ConversationBuffer::new(window_size);
        info!(window_size = window_size.get(), "Conversation buffer reset");
        writeln!(
            self.output,
            "Created new conversation buffer with context window size: {}",
            window_size
        )?;
        Ok(())
    }

    fn run_demo(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            self.theme.bold("Running healthy recipe brainstorming demo...")
        )?;
        for line in DEMO_SCRIPT {
            writeln!(self.output, "{} {}", self.theme.paint(">", Color::DarkGrey), line)?;
            self.handle_input(line)?;
        }
        Ok(())
    }
}
