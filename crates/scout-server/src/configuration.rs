use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use scout::{
    agent::DEFAULT_MAX_TURNS,
    invoker::{Credentials, InvokerConfig, ModelSelection, DEFAULT_TEMPERATURE},
    providers::configs::GEMINI_HOST,
    systems::SearchConfig,
};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                env_var: to_env_var("server.host"),
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct InvokerSettings {
    #[serde(default = "default_gemini_host")]
    pub gemini_host: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<i32>,
    #[serde(default)]
    pub pinned_model: Option<String>,
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            gemini_host: default_gemini_host(),
            temperature: default_temperature(),
            max_tokens: None,
            pinned_model: None,
            max_turns: default_max_turns(),
            search: SearchConfig::default(),
        }
    }
}

impl InvokerSettings {
    // Convert to the scout InvokerConfig
    pub fn into_config(self, credentials: Credentials) -> InvokerConfig {
        let model_selection = match self.pinned_model {
            Some(model) if !model.trim().is_empty() => ModelSelection::Pinned(model),
            _ => ModelSelection::Requested,
        };

        InvokerConfig {
            credentials,
            gemini_host: self.gemini_host,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            search: self.search,
            model_selection,
            max_turns: self.max_turns,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub invoker: InvokerSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("SCOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Every field has a default, so only badly typed values can fail here
        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.invoker.temperature) {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("invoker.temperature"),
                message: format!("{} is outside 0.0..=2.0", self.invoker.temperature),
            });
        }
        if self.invoker.search.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                env_var: to_env_var("invoker.search.max_results"),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9999
}

fn default_gemini_host() -> String {
    GEMINI_HOST.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}
