use thiserror::Error;

/// Errors reported by the library.
///
/// Engines fail fast: an [`Error::InvalidInput`] is returned before any
/// search state is built, so a failed call leaves nothing behind.
#[derive(Debug, Error)]
pub enum Error {
    /// The input violated a precondition of the requested operation.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A graph or anchor file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
