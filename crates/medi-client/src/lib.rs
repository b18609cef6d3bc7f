//! # medi-client
//!
//! HTTP implementation of the session's [`QueryClient`] seam.
//!
//! Each prompt is sent as `POST {backend.url}{backend.query_path}` with body
//! `{"query": "<prompt>"}`. The backend's JSON answer is flattened into a
//! [`QueryResult`]: the `response` text is the first non-empty of `response`,
//! `result` or `answer`, falling back to the whole body re-serialized (the
//! patient backend answers `{"results": {...}}` directly).

mod error;
mod http;

pub use error::ClientError;

use std::time::Duration;

use async_trait::async_trait;
use medi_config::BackendConfig;
use medi_core::{QueryError, QueryResult};
use medi_session::QueryClient;
use serde_json::{Value, json};

use crate::http::check_response;

/// Fields checked, in order, for the answer text.
const RESPONSE_FIELDS: [&str; 3] = ["response", "result", "answer"];

/// HTTP client for the natural-language patient query backend.
pub struct HttpQueryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpQueryClient {
    /// Create a client from the backend configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("reqwest client should build"),
            endpoint: config.query_url(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one prompt to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails, the backend returns a
    /// non-success status, or the body is not JSON.
    pub async fn query(&self, prompt: &str) -> Result<QueryResult, ClientError> {
        tracing::debug!(endpoint = %self.endpoint, chars = prompt.chars().count(), "sending query");
        let resp = check_response(
            self.http
                .post(&self.endpoint)
                .json(&json!({ "query": prompt }))
                .send()
                .await?,
        )
        .await?;

        let body: Value = resp.json().await?;
        Ok(extract_result(body))
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn perform_query(&self, prompt: &str) -> Result<QueryResult, QueryError> {
        self.query(prompt).await.map_err(QueryError::from)
    }
}

/// Flatten a backend answer into a [`QueryResult`].
#[must_use]
pub fn extract_result(body: Value) -> QueryResult {
    let response = RESPONSE_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(answer_text))
        .unwrap_or_else(|| body.to_string());
    let error = body.get("error").and_then(answer_text);

    QueryResult {
        response: Some(response),
        error,
    }
}

/// Text of a field, treating `null`, `false`, `0` and `""` as absent.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
