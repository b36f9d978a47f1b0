// src/lang/error.rs
//! Script compilation errors.

use std::fmt;
use std::io;

/// Why a script failed to compile. Line numbers are 1-based.
#[derive(Debug)]
pub enum ParseError {
    /// The first token of a line is not a known command.
    UnknownCommand { line: usize, command: String },
    /// An argument is not a number.
    InvalidArgument {
        line: usize,
        command: String,
        argument: String,
    },
    /// The command needs more arguments than were given.
    MissingArgument {
        line: usize,
        command: String,
        expected: usize,
        found: usize,
    },
    /// Reading the script failed.
    Io(io::Error),
}

impl ParseError {
    /// Line the error was found on, if it came from a script line.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnknownCommand { line, .. }
            | ParseError::InvalidArgument { line, .. }
            | ParseError::MissingArgument { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand { line, command } => {
                write!(f, "line {}: unknown command '{}'", line, command)
            }
            ParseError::InvalidArgument {
                line,
                command,
                argument,
            } => write!(
                f,
                "line {}: invalid argument '{}' for '{}'",
                line, argument, command
            ),
            ParseError::MissingArgument {
                line,
                command,
                expected,
                found,
            } => write!(
                f,
                "line {}: '{}' expects {} arguments, got {}",
                line, command, expected, found
            ),
            ParseError::Io(e) => write!(f, "failed to read script: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}
