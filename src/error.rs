//! Error types for schema loading, decoding and conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or decoding schemas.
///
/// Conversion itself is infallible; everything here happens at the JSON
/// boundary around it.
#[derive(Debug, Error)]
pub enum ConvertError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Schema errors (exit code 2)
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },

    #[error("unsupported model variant at {path}: '{keyword}' has no model representation")]
    UnsupportedModelVariant { path: String, keyword: String },

    #[error("fragment not found: {fragment}")]
    FragmentNotFound { fragment: String },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::FileNotFound { .. } | ConvertError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            ConvertError::NetworkError { .. } => 3,
            _ => 2,
        }
    }

    pub(crate) fn invalid(path: &str, message: impl Into<String>) -> Self {
        ConvertError::InvalidSchema {
            path: display_path(path),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(path: &str, keyword: &str) -> Self {
        ConvertError::UnsupportedModelVariant {
            path: display_path(path),
            keyword: keyword.to_string(),
        }
    }
}

// The document root has an empty pointer; show it as "/".
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_error_exit_codes() {
        let err = ConvertError::FileNotFound {
            path: PathBuf::from("pet.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = ConvertError::invalid("/properties/id", "missing type");
        assert_eq!(err.exit_code(), 2);

        let err = ConvertError::unsupported("", "oneOf");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn convert_error_display() {
        let err = ConvertError::unsupported("", "oneOf");
        assert_eq!(
            err.to_string(),
            "unsupported model variant at /: 'oneOf' has no model representation"
        );

        let err = ConvertError::invalid("/allOf/1", "expected object, got string");
        assert_eq!(
            err.to_string(),
            "invalid schema at /allOf/1: expected object, got string"
        );
    }
}
