use std::fmt::{self, Display};
use std::io;

/// Provides `ContagionError` and maps to other errors to
/// convert to a `ContagionError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ContagionError {
    /// Population counts or parameters rejected before any particle is created.
    InvalidConfiguration(String),
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ReportError(String),
}

impl From<io::Error> for ContagionError {
    fn from(error: io::Error) -> Self {
        ContagionError::IoError(error)
    }
}

impl From<serde_json::Error> for ContagionError {
    fn from(error: serde_json::Error) -> Self {
        ContagionError::JsonError(error)
    }
}

impl From<csv::Error> for ContagionError {
    fn from(error: csv::Error) -> Self {
        ContagionError::CsvError(error)
    }
}

impl std::error::Error for ContagionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContagionError::IoError(error) => Some(error),
            ContagionError::JsonError(error) => Some(error),
            ContagionError::CsvError(error) => Some(error),
            ContagionError::InvalidConfiguration(_) | ContagionError::ReportError(_) => None,
        }
    }
}

impl Display for ContagionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContagionError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
            ContagionError::IoError(error) => write!(f, "i/o error: {error}"),
            ContagionError::JsonError(error) => write!(f, "json error: {error}"),
            ContagionError::CsvError(error) => write!(f, "csv error: {error}"),
            ContagionError::ReportError(msg) => write!(f, "report error: {msg}"),
        }
    }
}

/// Shorthand for building an `InvalidConfiguration` error from a message.
pub(crate) fn invalid_configuration<S: Into<String>>(msg: S) -> ContagionError {
    ContagionError::InvalidConfiguration(msg.into())
}
