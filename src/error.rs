use std::error;
use std::fmt;

/// Errors reported by list construction and reconfiguration.
///
/// Missing keys are never an error; lookups and removals on absent keys
/// return `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The level ceiling must be at least 1.
    InvalidMaxLevel(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidMaxLevel(level) => {
                write!(f, "max level must be positive, got {}", level)
            }
        }
    }
}

impl error::Error for Error {}
