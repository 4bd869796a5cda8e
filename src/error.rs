//! Error types for chart document assembly.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort an assembly pass.
///
/// Every error is raised before the pass commits anything, so the document
/// produced by the previous successful pass stays in effect.
#[derive(Error, Debug)]
pub enum Error {
    /// The part graph is structurally invalid (missing sub-part or
    /// cross-reference, duplicate axis kind, stale data under skip-data).
    #[error("invalid {part}: {message}")]
    StructuralValidation {
        /// Description of the offending part.
        part: String,
        /// What is wrong with it.
        message: String,
    },

    /// A raw JSON fragment failed the strict re-parse.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The assembled document failed the final strict parse.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },
}

impl Error {
    /// Structural validation failure for the named part.
    pub fn structural(part: impl Into<String>, message: impl Into<String>) -> Self {
        Error::StructuralValidation {
            part: part.into(),
            message: message.into(),
        }
    }

    /// Encoding failure.
    pub fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding(message.into())
    }

    /// True for [`Error::StructuralValidation`].
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::StructuralValidation { .. })
    }

    /// True for failures raised while writing JSON.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_) | Error::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_display_names_part() {
        let err = Error::structural("Data #12", "no serial from a previous pass");
        assert!(err.is_structural());
        assert!(err.to_string().contains("Data #12"));
        assert!(err.to_string().contains("previous pass"));
    }

    #[test]
    fn test_encoding_display() {
        let err = Error::encoding("bad fragment");
        assert!(err.is_encoding());
        assert!(!err.is_structural());
        assert!(err.to_string().contains("bad fragment"));
    }

    #[test]
    fn test_json_error_is_encoding() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(err.is_encoding());
    }

    #[test]
    fn test_config_parse_display() {
        let err = Error::ConfigParse {
            line: 4,
            message: "invalid type".into(),
        };
        assert!(err.to_string().contains("line 4"));
    }
}
