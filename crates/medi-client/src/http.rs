//! Shared HTTP response helpers.

use crate::error::ClientError;

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. Otherwise returns
/// [`ClientError::Api`] carrying the status code and its reason phrase; the
/// response body is only logged.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body, "backend returned an error status");
    Err(ClientError::Api {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or_default().to_string(),
    })
}
