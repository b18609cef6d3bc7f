//! Session (submission gating and prompt input) configuration.

use medi_core::SubmitPolicy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The prompt textarea caps input at this many characters.
const fn default_max_prompt_chars() -> usize {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Whether a new submission must wait for the outstanding one.
    #[serde(default)]
    pub policy: SubmitPolicy,

    /// Maximum prompt length in characters; longer input is truncated.
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: SubmitPolicy::default(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

impl SessionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_prompt_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_prompt_chars".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
