//! Liveness probe.

use axum::http::StatusCode;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Page routes do no work at probe time.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
