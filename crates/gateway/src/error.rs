use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that stop the gateway from starting.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to read config file {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Failed to read shell template {path}: {reason}")]
    ShellTemplate { path: String, reason: String },

    #[error("Route `{0}` has no content or producer configured")]
    MissingContent(String),

    #[error("Route `{0}` configures both inline content and a producer")]
    AmbiguousContent(String),

    #[error("Route `{path}` references unknown producer `{producer}`")]
    UnknownProducer { path: String, producer: String },

    #[error("Route `{0}` is configured more than once")]
    DuplicateRoute(String),

    #[error("Route path `{0}` must start with `/` and use `{{name}}` captures")]
    InvalidPath(String),

    #[error("Route `{path}` conflicts with an existing route: {reason}")]
    ConflictingRoute { path: String, reason: String },

    #[error("Route path `{0}` is reserved by the gateway")]
    ReservedPath(String),
}

pub type Result<T> = std::result::Result<T, SetupError>;

/// Errors raised while turning a render result into a response.
///
/// Content producer failures never end up here; they are already folded into
/// the render result by the invoker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Redirect result is missing a path")]
    MissingRedirectPath,

    #[error("Invalid status code {0}")]
    InvalidStatus(u16),
}

impl PageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PageError::MissingRedirectPath | PageError::InvalidStatus(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Page render failed");

        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_maps_to_500() {
        let response = PageError::MissingRedirectPath.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            PageError::InvalidStatus(42).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_setup_error_messages() {
        assert_eq!(
            SetupError::MissingContent("/about".to_string()).to_string(),
            "Route `/about` has no content or producer configured"
        );
        assert_eq!(
            SetupError::UnknownProducer {
                path: "/".to_string(),
                producer: "home".to_string(),
            }
            .to_string(),
            "Route `/` references unknown producer `home`"
        );
    }
}
