//! Error types for code generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating code
#[derive(Error, Debug)]
pub enum Error {
    /// The IDL input is malformed
    #[error("failed to parse IDL: {0}")]
    ParseError(#[from] idlgen_core::ParseError),

    /// The requested generator is not registered
    #[error("unknown code generator '{name}' (available: {})", .available.join(", "))]
    UnknownGenerator {
        /// Name that was requested
        name: String,
        /// Registered names
        available: Vec<&'static str>,
    },

    /// A write would land outside the output directory
    #[error("path '{}' resolves outside the output directory", .path.display())]
    PathViolation {
        /// Relative path as requested by the generator
        path: PathBuf,
    },

    /// Output directory is missing and creation was not requested
    #[error("output directory '{}' does not exist or is not a directory", .path.display())]
    OutputDirMissing {
        /// Configured output directory
        path: PathBuf,
    },

    /// Filesystem failure
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Backend-internal failure
    #[error("code generation failed: {0}")]
    GenerationError(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_generator_lists_available() {
        let err = Error::UnknownGenerator {
            name: "cobol".to_string(),
            available: vec!["java", "json"],
        };
        assert_eq!(
            err.to_string(),
            "unknown code generator 'cobol' (available: java, json)"
        );
    }

    #[test]
    fn test_generation_error_keeps_message() {
        let err = Error::GenerationError("template blew up".to_string());
        assert!(err.to_string().ends_with("template blew up"));
    }

    #[test]
    fn test_parse_error_converts() {
        let err: Error = idlgen_core::ParseError::at("expected '='", 2, 5).into();
        assert_eq!(
            err.to_string(),
            "failed to parse IDL: expected '=' at line 2, column 5"
        );
    }
}
