use std::fmt::Display;
use std::io::{self, Write};

use crossterm::style::{style, Color, Stylize};

use crate::buffer::{BufferStatus, FinalizedPair, Snapshot};

const RULE_WIDTH: usize = 30;

/// Whether output gets ANSI styling. Plain when it is piped or captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        if self.color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Pick between a pre-styled banner and its untagged twin.
    pub fn banner(&self, colored: &'static str, plain: &'static str) -> &'static str {
        if self.color {
            colored
        } else {
            plain
        }
    }
}

fn full_marker(status: &BufferStatus) -> &'static str {
    if status.window_full {
        " (window full)"
    } else {
        ""
    }
}

/// Render the finalized window followed by the turn still being edited.
pub fn write_history(output: &mut dyn Write, theme: Theme, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(output, "\n{}", theme.bold("=== CONVERSATION HISTORY ==="))?;

    if snapshot.pairs.is_empty() && snapshot.pending.is_none() {
        writeln!(output, "No conversation history available.")?;
        return Ok(());
    }

    for (position, pair) in snapshot.pairs.iter().enumerate() {
        write_pair(output, theme, position + 1, pair)?;
    }

    if let Some(pending) = &snapshot.pending {
        writeln!(
            output,
            "{}. Prompt: '{}' {}",
            snapshot.pairs.len() + 1,
            pending.prompt.text(),
            theme.paint("(pending)", Color::Yellow)
        )?;
        if pending.candidates.is_empty() {
            writeln!(output, "   Response: {}", theme.paint("(no responses yet)", Color::DarkGrey))?;
        }
        for (i, candidate) in pending.candidates.iter().enumerate() {
            let marker = if i == 0 {
                theme.paint("(current)", Color::Green)
            } else {
                theme.paint("(superseded)", Color::DarkGrey)
            };
            writeln!(output, "   Response {}: '{}' {}", i + 1, candidate.text(), marker)?;
        }
    }

    writeln!(
        output,
        "{}",
        theme.paint(
            format!(
                "Context window: {}/{} pairs{}",
                snapshot.status.finalized_count,
                snapshot.status.window_capacity,
                full_marker(&snapshot.status)
            ),
            Color::DarkGrey
        )
    )?;
    writeln!(output, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}

fn write_pair(
    output: &mut dyn Write,
    theme: Theme,
    position: usize,
    pair: &FinalizedPair,
) -> io::Result<()> {
    writeln!(output, "{}. Prompt: '{}'", position, pair.prompt().text())?;
    writeln!(output, "   Response: '{}'", pair.response().text())?;
    writeln!(
        output,
        "   {}",
        theme.paint(
            format!(
                "#{} finalized {}",
                pair.sequence_index(),
                pair.finalized_at().format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Color::DarkGrey
        )
    )?;
    writeln!(output)?;
    Ok(())
}

pub fn write_status(output: &mut dyn Write, theme: Theme, status: &BufferStatus) -> io::Result<()> {
    writeln!(output, "State: {}", theme.paint(status.state, Color::Cyan))?;
    writeln!(
        output,
        "Current Prompt: {}",
        status.current_prompt.as_deref().unwrap_or("(none)")
    )?;
    writeln!(output, "Pending Responses: {}", status.response_stack_depth)?;
    writeln!(
        output,
        "Finalized Pairs: {}/{} ({:.0}% of context window){}",
        status.finalized_count,
        status.window_capacity,
        status.window_utilization() * 100.0,
        full_marker(status)
    )?;
    writeln!(output, "Total Finalized: {}", status.total_finalized)?;
    writeln!(output, "Total Prompts: {}", status.total_prompts)?;
    Ok(())
}

pub fn write_error(output: &mut dyn Write, theme: Theme, message: impl Display) -> io::Result<()> {
    let label = if theme.is_colored() {
        style("Error:").red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    writeln!(output, "{} {}", label, message)
}
