// src/core/parser.rs

use crate::{constants::MAX_ARGS, models::CommandLine};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Command line could not be parsed (unbalanced quotes?): {0}")]
    Unbalanced(String),
    #[error("Too many arguments (max {MAX_ARGS}).")]
    TooManyArguments,
}

/// Splits a raw input line into a `CommandLine`.
///
/// Quoted words are kept together (`echo 'hello world'` has two arguments).
/// If the last argument starts with `&`, the job is requested in the background
/// and that argument is dropped. Returns `Ok(None)` for a blank line, or for a
/// line that is nothing but `&`.
pub fn parse_line(line: &str) -> Result<Option<CommandLine>, ParseError> {
    let text = line.trim_end_matches(['\n', '\r']);
    if text.trim().is_empty() {
        return Ok(None);
    }

    let mut argv = shlex::split(text).ok_or_else(|| ParseError::Unbalanced(text.to_string()))?;

    let background = argv.last().is_some_and(|last| last.starts_with('&'));
    if background {
        argv.pop();
    }
    if argv.is_empty() {
        return Ok(None);
    }
    if argv.len() > MAX_ARGS {
        return Err(ParseError::TooManyArguments);
    }

    Ok(Some(CommandLine {
        argv,
        background,
        text: text.to_string(),
    }))
}
