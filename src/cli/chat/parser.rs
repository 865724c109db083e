use std::num::NonZeroUsize;

use thiserror::Error;
use winnow::branch::alt;
use winnow::bytes::{tag, tag_no_case};
use winnow::character::{digit1, space0, space1};
use winnow::combinator::{eof, opt, rest};
use winnow::sequence::{preceded, terminated};
use winnow::{IResult, Parser};

use super::command::Command;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No command given")]
    Empty,
    #[error("Unknown command: {0}. Type HELP to list commands.")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid context window size: {0} (must be a positive integer)")]
    InvalidWindowSize(String),
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    AddPrompt,
    AddResponse,
    Undo,
    Finalize,
    History,
    Status,
    Reset,
    Demo,
    Help,
    Quit,
}

impl Keyword {
    fn usage(self) -> &'static str {
        match self {
            Keyword::AddPrompt => "ADD_PROMPT <text>",
            Keyword::AddResponse => "ADD_RESPONSE <text>",
            Keyword::Undo => "UNDO",
            Keyword::Finalize => "FINALIZE",
            Keyword::History => "HISTORY",
            Keyword::Status => "STATUS",
            Keyword::Reset => "RESET [K]",
            Keyword::Demo => "DEMO",
            Keyword::Help => "HELP",
            Keyword::Quit => "QUIT",
        }
    }
}

fn command_keyword(input: &str) -> IResult<&str, Keyword> {
    alt((
        tag_no_case("add_prompt").map(|_| Keyword::AddPrompt),
        tag_no_case("add_response").map(|_| Keyword::AddResponse),
        tag_no_case("undo").map(|_| Keyword::Undo),
        tag_no_case("finalize").map(|_| Keyword::Finalize),
        tag_no_case("history").map(|_| Keyword::History),
        tag_no_case("status").map(|_| Keyword::Status),
        tag_no_case("reset").map(|_| Keyword::Reset),
        tag_no_case("demo").map(|_| Keyword::Demo),
        tag_no_case("help").map(|_| Keyword::Help),
        tag_no_case("quit").map(|_| Keyword::Quit),
        tag_no_case("exit").map(|_| Keyword::Quit),
    ))
    .parse_next(input)
}

/// Everything after the keyword, trimmed. A missing argument yields an empty
/// string so the buffer can reject it as blank input.
fn text_argument(input: &str) -> IResult<&str, String> {
    opt(preceded(space1, rest))
        .map(|text: Option<&str>| text.map(str::trim).unwrap_or_default().to_string())
        .parse_next(input)
}

fn no_argument(input: &str) -> IResult<&str, ()> {
    terminated(space0, eof).map(|_| ()).parse_next(input)
}

fn window_argument(input: &str) -> IResult<&str, Option<&str>> {
    terminated(opt(preceded(space1, digit1)), eof).parse_next(input)
}

/// Parse one line of input into a [`Command`].
///
/// Keywords are case-insensitive and may carry a leading `/`. Text arguments
/// keep their case.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (args, keyword) = preceded(opt(tag("/")), command_keyword)
        .parse_next(line)
        .map_err(|_| ParseError::UnknownCommand(line.to_string()))?;

    // "undone" must not parse as UNDO
    if !(args.is_empty() || args.starts_with(char::is_whitespace)) {
        return Err(ParseError::UnknownCommand(line.to_string()));
    }

    let usage = |_| ParseError::Usage(keyword.usage());
    let bare = |command| no_argument(args).map(|_| command).map_err(usage);
    let command = match keyword {
        Keyword::AddPrompt => Command::AddPrompt(text_argument(args).map_err(usage)?.1),
        Keyword::AddResponse => Command::AddResponse(text_argument(args).map_err(usage)?.1),
        Keyword::Reset => match window_argument(args).map_err(usage)?.1 {
            Some(digits) => {
                let size = digits
                    .parse::<usize>()
                    .ok()
                    .and_then(NonZeroUsize::new)
                    .ok_or_else(|| ParseError::InvalidWindowSize(digits.to_string()))?;
                Command::Reset(Some(size))
            }
            None => Command::Reset(None),
        },
        Keyword::Undo => bare(Command::Undo)?,
        Keyword::Finalize => bare(Command::Finalize)?,
        Keyword::History => bare(Command::History)?,
        Keyword::Status => bare(Command::Status)?,
        Keyword::Demo => bare(Command::Demo)?,
        Keyword::Help => bare(Command::Help)?,
        Keyword::Quit => bare(Command::Quit)?,
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_commands_keep_case() {
        assert_eq!(
            parse_command("ADD_PROMPT Suggest a Healthy Salad"),
            Ok(Command::AddPrompt("Suggest a Healthy Salad".to_string()))
        );
        assert_eq!(
            parse_command("add_response   Kale salad with lemon dressing  "),
            Ok(Command::AddResponse("Kale salad with lemon dressing".to_string()))
        );
    }

    #[test]
    fn test_missing_text_becomes_blank() {
        assert_eq!(parse_command("ADD_PROMPT"), Ok(Command::AddPrompt(String::new())));
        assert_eq!(parse_command("add_response"), Ok(Command::AddResponse(String::new())));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("UNDO"), Ok(Command::Undo));
        assert_eq!(parse_command("finalize"), Ok(Command::Finalize));
        assert_eq!(parse_command("  History  "), Ok(Command::History));
        assert_eq!(parse_command("STATUS"), Ok(Command::Status));
        assert_eq!(parse_command("demo"), Ok(Command::Demo));
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_slash_prefix() {
        assert_eq!(parse_command("/undo"), Ok(Command::Undo));
        assert_eq!(parse_command("/quit"), Ok(Command::Quit));
        assert_eq!(
            parse_command("/add_prompt hi"),
            Ok(Command::AddPrompt("hi".to_string()))
        );
    }

    #[test]
    fn test_reset_window_size() {
        assert_eq!(parse_command("RESET"), Ok(Command::Reset(None)));
        assert_eq!(
            parse_command("reset 5"),
            Ok(Command::Reset(NonZeroUsize::new(5)))
        );
        assert_eq!(
            parse_command("reset 0"),
            Err(ParseError::InvalidWindowSize("0".to_string()))
        );
        assert_eq!(parse_command("reset five"), Err(ParseError::Usage("RESET [K]")));
    }

    #[test]
    fn test_unexpected_arguments() {
        assert_eq!(parse_command("UNDO please"), Err(ParseError::Usage("UNDO")));
        assert_eq!(parse_command("finalize now"), Err(ParseError::Usage("FINALIZE")));
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(
            parse_command("undone"),
            Err(ParseError::UnknownCommand("undone".to_string()))
        );
        assert_eq!(
            parse_command("hello there"),
            Err(ParseError::UnknownCommand("hello there".to_string()))
        );
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
    }
}
