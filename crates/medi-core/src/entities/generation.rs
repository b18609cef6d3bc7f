use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::GenerationStatus;
use crate::errors::CoreError;
use crate::ids::GenerationId;
use crate::payload::PatientResultPayload;

/// Body of a successful generation.
///
/// A response that cannot be decoded still counts as a successful request; only
/// its rendering degrades.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseBody {
    Payload(PatientResultPayload),
    Malformed { raw: String, reason: String },
}

impl ResponseBody {
    /// Decode the collaborator's `response` string.
    #[must_use]
    pub fn from_response(response: Option<&str>) -> Self {
        let Some(raw) = response.filter(|raw| !raw.trim().is_empty()) else {
            return Self::Malformed {
                raw: String::new(),
                reason: "no response received".to_string(),
            };
        };

        match PatientResultPayload::decode(raw) {
            Ok(payload) => Self::Payload(payload),
            Err(error) => {
                tracing::warn!(%error, "response could not be decoded; rendering empty state");
                Self::Malformed {
                    raw: raw.to_string(),
                    reason: error.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&PatientResultPayload> {
        match self {
            Self::Payload(payload) => Some(payload),
            Self::Malformed { .. } => None,
        }
    }
}

/// One user exchange: the prompt plus its eventual outcome.
///
/// Status, response and error message are only changed through
/// [`Generation::resolve_success`] and [`Generation::resolve_error`], which
/// enforce a single terminal transition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Generation {
    pub id: GenerationId,
    pub prompt: String,
    /// Display only; insertion order in the store is authoritative.
    pub created_at: DateTime<Utc>,
    status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<ResponseBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl Generation {
    /// A freshly submitted generation.
    #[must_use]
    pub fn pending(id: GenerationId, prompt: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            created_at,
            status: GenerationStatus::Pending,
            response: None,
            error_message: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> GenerationStatus {
        self.status
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, GenerationStatus::Pending)
    }

    /// Present only when the status is `Success`.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseBody> {
        self.response.as_ref()
    }

    /// Present only when the status is `Error`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Transition `Pending → Success`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if the generation is already terminal.
    pub fn resolve_success(&mut self, body: ResponseBody) -> Result<(), CoreError> {
        self.transition(GenerationStatus::Success)?;
        self.response = Some(body);
        Ok(())
    }

    /// Transition `Pending → Error`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if the generation is already terminal.
    pub fn resolve_error(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.transition(GenerationStatus::Error)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    fn transition(&mut self, next: GenerationStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
