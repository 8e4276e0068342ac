use std::fmt;

/// One line of input at the scoring prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCommand {
    /// Dart values (or one visit total) for the current player
    Throw(Vec<String>),
    /// Take back the last accepted turn
    Undo,
    /// Stop now and rank everybody
    End,
    /// Discard the match without a result
    Abandon,
    /// Print the scoreboard
    Show,
    /// Print current rankings
    Rankings,
    /// Print the command list
    Help,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace was entered.
    EmptyInput,
    /// `throw` without any values.
    ThrowMissingValues,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Enter dart values (e.g., '60 60 60') or a command"),
            Self::ThrowMissingValues => {
                write!(f, "Throw requires at least one value (e.g., 'throw 20 19')")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const COMMAND_HELP: &str = "\
  <values>        Score a turn, e.g. '60 60 60', '20,19,18' or '140'
  throw <values>  Same as above
  undo            Take back the last turn
  show            Print the scoreboard
  rankings        Print current rankings
  end             Finish now and rank everybody
  abandon         Drop the match without a result
  help            Show this list";

/// Parse a prompt line into a MatchCommand.
///
/// Values are only split here; range checks are the engine's job so the
/// user sees the same message whichever way the turn was entered.
///
/// # Arguments
///
/// * `input` - The raw line typed at the prompt
///
/// # Returns
///
/// * `Ok(MatchCommand)` - Successfully parsed command
/// * `Err(ParseError)` - Parse error with descriptive message
///
/// # Examples
///
/// ```
/// use darts_cli::commands::{MatchCommand, parse_command};
///
/// assert_eq!(parse_command("undo"), Ok(MatchCommand::Undo));
/// assert_eq!(
///     parse_command("20, 19 18"),
///     Ok(MatchCommand::Throw(vec!["20".into(), "19".into(), "18".into()]))
/// );
/// ```
pub fn parse_command(input: &str) -> Result<MatchCommand, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    match trimmed.to_lowercase().as_str() {
        "undo" | "u" => return Ok(MatchCommand::Undo),
        "end" => return Ok(MatchCommand::End),
        "abandon" | "quit" | "q" => return Ok(MatchCommand::Abandon),
        "show" | "board" => return Ok(MatchCommand::Show),
        "rankings" | "rank" => return Ok(MatchCommand::Rankings),
        "help" | "?" => return Ok(MatchCommand::Help),
        _ => {}
    }

    let parts = split_values(trimmed);
    match parts.first() {
        Some(first) if first.eq_ignore_ascii_case("throw") => {
            let values = parts[1..].to_vec();
            if values.is_empty() {
                Err(ParseError::ThrowMissingValues)
            } else {
                Ok(MatchCommand::Throw(values))
            }
        }
        // Anything starting with a digit or sign is a turn; the engine
        // rejects the bad ones
        Some(first) if first.starts_with(|c: char| c.is_ascii_digit() || c == '-') => {
            Ok(MatchCommand::Throw(parts))
        }
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Split on whitespace and commas, dropping empty pieces
fn split_values(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
