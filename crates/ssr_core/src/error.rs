//! Core SSR gateway error types (pure - no I/O variants).

use thiserror::Error;

/// Errors raised while parsing a build or icon manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Manifest is not valid JSON: {0}")]
    Parse(String),

    #[error("Manifest is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Manifest field `{field}` has an unexpected shape")]
    InvalidField { field: &'static str },
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure reported by a content producer.
///
/// Carries an optional HTTP status; the invoker falls back to 500 when absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ContentError {
    pub status: Option<u16>,
    pub message: String,
}

impl ContentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Attach the HTTP status the failure should surface as.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Status to reply with: the declared one, else 500.
    pub fn status_or_default(&self) -> u16 {
        self.status.unwrap_or(500)
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_defaults_to_500() {
        let err = ContentError::new("boom");
        assert_eq!(err.status_or_default(), 500);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_content_error_keeps_declared_status() {
        let err = ContentError::new("missing").with_status(404);
        assert_eq!(err.status_or_default(), 404);
    }

    #[test]
    fn test_manifest_error_from_serde() {
        let err: ManifestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ManifestError::Parse(_)));
    }
}
