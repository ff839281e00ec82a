//! Error types for the distortion engine.
//!
//! Runtime paths (timers, frames, toggles) never fail; only construction,
//! configuration and dictionary loading return errors.

use std::fmt;
use std::io;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine setup.
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading input text or a dictionary file.
    Io(io::Error),
    /// Configuration value rejected by [`EngineConfig::validate`](crate::EngineConfig::validate).
    InvalidConfig(String),
    /// Malformed line in a substitution dictionary source.
    Dictionary { line: usize, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            Self::Dictionary { line, reason } => {
                write!(f, "dictionary line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("probability 1.5".to_string());
        assert!(err.to_string().contains("invalid configuration"));

        let err = Error::Dictionary {
            line: 7,
            reason: "missing ':'".to_string(),
        };
        assert_eq!(err.to_string(), "dictionary line 7: missing ':'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
