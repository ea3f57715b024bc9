//! Error handling for the Sift IR toolkit
//!
//! This module defines the recoverable error type shared by the IR layer
//! and the driver. Contract violations inside a rewrite (erased-handle
//! access, markers in the wrong block, double erase) are programming
//! errors and panic instead of flowing through this type.

use thiserror::Error;

/// Toolkit-wide error type for recoverable failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiftError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("JSON error: {message}")]
    Json { message: String },

    #[error("Verification failed in '{function}': {message}")]
    Verify { function: String, message: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },
}

impl SiftError {
    /// Create a verification error
    pub fn verify(function: impl Into<String>, message: impl Into<String>) -> Self {
        SiftError::Verify {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_error_display() {
        let err = SiftError::verify("main", "block bb1 has no terminator");
        assert_eq!(
            err.to_string(),
            "Verification failed in 'main': block bb1 has no terminator"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SiftError = io.into();
        assert!(matches!(err, SiftError::Io { .. }));
    }
}
