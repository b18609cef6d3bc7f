//! Patient result payload model and lenient decoding.
//!
//! The backend answers `{"results": {"query": {...}, "summary": {...}, "patients": [...]}}`.
//! Records are not schema-fixed, so patients and summary stay as ordered JSON maps;
//! consumers derive their schema at render time (table columns come from the first
//! record's keys).
//!
//! Decoding never fails on shape problems below the top level: a non-array `patients`
//! or a non-object `summary` is treated as absent, and non-object patient entries are
//! skipped. Only a document that is not JSON, or not an object, is rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::PayloadError;

/// A JSON object with keys in document order.
pub type Record = Map<String, Value>;

/// Key of the backend's wrapper object.
pub const RESULTS_KEY: &str = "results";
/// Summary key holding the gender → count distribution.
pub const GENDER_DISTRIBUTION_KEY: &str = "gender_distribution";
/// Summary key holding the age group → count distribution.
pub const AGE_DISTRIBUTION_KEY: &str = "age_distribution";
/// Reserved summary key nesting `cities` and `states`.
pub const LOCATIONS_KEY: &str = "locations";
pub const CITIES_KEY: &str = "cities";
pub const STATES_KEY: &str = "states";

/// Query result for one prompt: patient records plus aggregate metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PatientResultPayload {
    /// Search parameters echoed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Record>,
    /// Patient records, each a mapping of named fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients: Option<Vec<Record>>,
    /// Aggregate metrics: scalars or nested `label → count` mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Record>,
}

impl PatientResultPayload {
    /// Decode a response document.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Decode`] when `raw` is not JSON and
    /// [`PayloadError::Malformed`] when it is not a JSON object.
    pub fn decode(raw: &str) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|error| PayloadError::Decode(error.to_string()))?;
        Self::from_value(value)
    }

    /// Build a payload from an already-parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] when `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut document) = value else {
            return Err(PayloadError::Malformed(format!(
                "expected a JSON object, found {}",
                kind_of(&value)
            )));
        };

        if let Some(Value::Object(results)) = document.remove(RESULTS_KEY) {
            document = results;
        }

        let query = match document.remove("query").or_else(|| document.remove("params")) {
            Some(Value::Object(params)) => Some(params),
            _ => None,
        };

        let patients = match document.remove("patients") {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| match item {
                        Value::Object(record) => Some(record),
                        other => {
                            tracing::warn!(index, kind = kind_of(&other), "skipping non-object patient record");
                            None
                        }
                    })
                    .collect(),
            ),
            None | Some(Value::Null) => None,
            Some(other) => {
                tracing::warn!(kind = kind_of(&other), "ignoring non-array patients field");
                None
            }
        };

        let summary = match document.remove("summary") {
            Some(Value::Object(summary)) => Some(summary),
            None | Some(Value::Null) => None,
            Some(other) => {
                tracing::warn!(kind = kind_of(&other), "ignoring non-object summary field");
                None
            }
        };

        Ok(Self {
            query,
            patients,
            summary,
        })
    }

    /// Encode as a bare payload document (no `results` wrapper).
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Patient records, empty when absent.
    #[must_use]
    pub fn patients(&self) -> &[Record] {
        self.patients.as_deref().unwrap_or_default()
    }

    /// A nested mapping under `summary`, if present and an object.
    #[must_use]
    pub fn summary_map(&self, key: &str) -> Option<&Record> {
        self.summary.as_ref()?.get(key)?.as_object()
    }

    /// A mapping nested under `summary.locations`.
    #[must_use]
    pub fn location_map(&self, key: &str) -> Option<&Record> {
        self.summary_map(LOCATIONS_KEY)?.get(key)?.as_object()
    }

    #[must_use]
    pub fn gender_distribution(&self) -> Option<&Record> {
        self.summary_map(GENDER_DISTRIBUTION_KEY)
    }

    #[must_use]
    pub fn age_distribution(&self) -> Option<&Record> {
        self.summary_map(AGE_DISTRIBUTION_KEY)
    }
}

/// Short name of a JSON value's type, for diagnostics.
#[must_use]
pub const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
