//! Query backend configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default backend base URL (the FHIR NL query API in local development).
fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_query_path() -> String {
    "/query".to_string()
}

/// The backend allows its own FHIR call 90 s, so the client waits as long.
const fn default_timeout_secs() -> u64 {
    90
}

fn default_user_agent() -> String {
    "medifire/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the query API, without trailing slash.
    #[serde(default = "default_url")]
    pub url: String,

    /// Path of the query endpoint, appended to `url`.
    #[serde(default = "default_query_path")]
    pub query_path: String,

    /// Whole-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            query_path: default_query_path(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl BackendConfig {
    /// Full URL of the query endpoint.
    #[must_use]
    pub fn query_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        if self.query_path.starts_with('/') {
            format!("{base}{}", self.query_path)
        } else {
            format!("{base}/{}", self.query_path)
        }
    }

    /// Whether the backend section differs from the built-in defaults.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        self.url != default_url() || self.query_path != default_query_path()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backend.url".into(),
                reason: "must not be empty".into(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.url".into(),
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
