use std::io;

use thiserror::Error;

/// Errors that end a run early.
#[derive(Debug, Error)]
pub enum Error {
    /// The interactive display could not be set up or drawn.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// A `--duration` value that could not be parsed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("missing unit after `{0}` (expected one of ms, s, m, h)")]
    MissingUnit(String),
    #[error("unknown unit `{0}` (expected one of ms, s, m, h)")]
    UnknownUnit(String),
    #[error("duration must be greater than zero")]
    Zero,
    #[error("duration is too large")]
    TooLarge,
}
