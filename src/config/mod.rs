//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `ATLAS` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use atlas_dialogue::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod dialogue;
mod error;
mod features;
mod server;
mod storage;

pub use ai::AiConfig;
pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// offline-capable configuration once an API key or offline synthesis is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted model settings
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub dialogue: DialogueConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ATLAS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `ATLAS__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `ATLAS__DIALOGUE__MAX_TURNS=10` -> `dialogue.max_turns = 10`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ATLAS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A hosted-model API key is required unless offline synthesis is on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.dialogue.validate()?;
        self.storage.validate()?;
        if !self.features.offline_synthesis && !self.ai.has_api_key() {
            return Err(ValidationError::MissingRequired("ATLAS__AI__API_KEY"));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
