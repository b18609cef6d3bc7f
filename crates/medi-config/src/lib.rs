//! # medi-config
//!
//! Layered configuration loading for MediFire using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MEDIFIRE_*` prefix, `__` as separator)
//! 2. Project-level `.medifire/config.toml`
//! 3. User-level `~/.config/medifire/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MEDIFIRE_BACKEND__URL` -> `backend.url`,
//! `MEDIFIRE_SESSION__POLICY` -> `session.policy`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use medi_config::MediConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = MediConfig::load_with_dotenv().expect("config");
//! println!("querying {}", config.backend.query_url());
//! ```

mod backend;
mod error;
mod general;
mod session;
mod suggestions;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use session::SessionConfig;
pub use suggestions::SuggestionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for all config keys.
pub const ENV_PREFIX: &str = "MEDIFIRE_";

/// Project-local config directory name.
pub const PROJECT_DIR: &str = ".medifire";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl MediConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Self::global_config_path().as_deref(), Path::new(PROJECT_DIR))
    }

    /// Build the provider chain for explicit global and project locations.
    #[must_use]
    pub fn figment_for(global_path: Option<&Path>, project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = global_path
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_dir.join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.session.validate()?;
        self.suggestions.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("medifire").join("config.toml"))
    }
}
