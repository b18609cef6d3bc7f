//! Autocomplete suggestion configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_min_query_chars() -> usize {
    2
}

const fn default_max_matches() -> usize {
    5
}

const fn default_min_display_matches() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestionConfig {
    /// Trimmed input shorter than this clears the suggestions.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Cap on the number of matches shown.
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,

    /// The dropdown is only shown with at least this many matches.
    #[serde(default = "default_min_display_matches")]
    pub min_display_matches: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            max_matches: default_max_matches(),
            min_display_matches: default_min_display_matches(),
        }
    }
}

impl SuggestionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_matches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "suggestions.max_matches".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
