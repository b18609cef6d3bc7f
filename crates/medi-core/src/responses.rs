//! The query collaborator contract.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the query collaborator hands back for one prompt.
///
/// `response` is a JSON document encoding a [`crate::PatientResultPayload`]
/// (possibly wrapped in `{"results": ...}`); `error` carries a backend-reported
/// failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QueryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    #[must_use]
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(error.into()),
        }
    }

    /// The backend error message, if one was reported and is non-empty.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_error_is_not_a_failure() {
        let result = QueryResult {
            response: Some("{}".into()),
            error: Some("  ".into()),
        };
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let result: QueryResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, QueryResult::default());
    }

    #[test]
    fn failure_carries_message() {
        assert_eq!(QueryResult::failure("boom").error_message(), Some("boom"));
    }
}
