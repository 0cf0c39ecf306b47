//! Line commands understood by the terminal front end.

use crate::types::{Filter, ParseFilterError, TodoId};
use std::num::ParseIntError;
use std::str::FromStr;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  add <text>                      add a todo
  toggle <id>                     mark a todo done or not done
  rm <id>                         delete a todo (alias: delete)
  filter <all|active|completed>   choose which todos are listed
  list                            show the list again
  help                            show this help
  quit                            leave (alias: exit)";

/// A parsed line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Submit `text` as a new todo (may be empty; the controller rejects it)
    Add(String),
    /// Flip a todo's completion flag
    Toggle(TodoId),
    /// Delete a todo
    Remove(TodoId),
    /// Change the list filter
    Filter(Filter),
    /// Re-render the list
    List,
    /// Print usage
    Help,
    /// Stop reading commands
    Quit,
}

/// Error returned for lines that are not a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Nothing but whitespace
    #[error("Empty command")]
    Empty,

    /// First word is not a known command
    #[error("Unknown command {0:?} (try `help`)")]
    Unknown(String),

    /// A required argument is absent
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command name as typed
        command: String,
        /// What is missing
        argument: &'static str,
    },

    /// The id argument is not a number
    #[error("Invalid todo id {input:?}: {source}")]
    InvalidId {
        /// Argument as typed
        input: String,
        /// Parse failure
        source: ParseIntError,
    },

    /// The filter argument is not a filter
    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),
}

fn parse_id(command: &str, rest: &str) -> Result<TodoId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            argument: "a todo id",
        });
    }
    rest.parse().map_err(|source| CommandError::InvalidId {
        input: rest.to_string(),
        source,
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" => parse_id(name, rest).map(Self::Toggle),
            "rm" | "delete" => parse_id(name, rest).map(Self::Remove),
            "filter" if rest.is_empty() => Err(CommandError::MissingArgument {
                command: name.to_string(),
                argument: "all, active or completed",
            }),
            "filter" => Ok(Self::Filter(rest.parse()?)),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    #[test]
    fn parses_documented_forms() {
        assert_eq!(
            "add Buy milk and eggs".parse::<Command>().unwrap(),
            Command::Add("Buy milk and eggs".to_string())
        );
        assert_eq!(
            "toggle 1735689600000".parse::<Command>().unwrap(),
            Command::Toggle(TodoId::from_millis(1_735_689_600_000))
        );
        assert_eq!(
            "rm 7".parse::<Command>().unwrap(),
            Command::Remove(TodoId::from_millis(7))
        );
        assert_eq!(
            "DELETE 7".parse::<Command>().unwrap(),
            Command::Remove(TodoId::from_millis(7))
        );
        assert_eq!(
            "filter Active".parse::<Command>().unwrap(),
            Command::Filter(Filter::Active)
        );
        assert_eq!("  list ".parse::<Command>().unwrap(), Command::List);
        assert_eq!("help".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn bare_add_is_an_empty_submit() {
        assert_eq!("add".parse::<Command>().unwrap(), Command::Add(String::new()));
        assert_eq!("add    ".parse::<Command>().unwrap(), Command::Add(String::new()));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "frobnicate 3".parse::<Command>(),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
        assert!(matches!(
            "toggle".parse::<Command>(),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            "rm seven".parse::<Command>(),
            Err(CommandError::InvalidId { .. })
        ));
        assert!(matches!(
            "filter done".parse::<Command>(),
            Err(CommandError::InvalidFilter(_))
        ));
        assert!(matches!(
            "filter".parse::<Command>(),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            "toggle".parse::<Command>().unwrap_err().to_string(),
            "`toggle` needs a todo id"
        );
        assert_eq!(
            "nope".parse::<Command>().unwrap_err().to_string(),
            "Unknown command \"nope\" (try `help`)"
        );
    }
}
