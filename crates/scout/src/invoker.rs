//! Single request/response entry point in front of the agent.
//!
//! An [`AgentInvoker`] is built once from an [`InvokerConfig`] and answers each
//! [`InvocationRequest`] with a plain string. Requests naming an unsupported provider get
//! the [`INVALID_PROVIDER`] string back; missing credentials and provider failures are
//! returned as errors for the caller to surface.
use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::agent::{Agent, DEFAULT_MAX_TURNS};
use crate::errors::ConfigError;
use crate::models::conversation::{to_messages, ConversationTurn};
use crate::models::message::Message;
use crate::providers::configs::{GeminiProviderConfig, ProviderConfig, GEMINI_HOST};
use crate::providers::factory::{get_provider, ProviderType};
use crate::systems::{build_tools, SearchConfig};

pub const INVALID_PROVIDER: &str = "Invalid provider";
pub const NO_RESPONSE: &str = "No response";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const SEARCH_API_KEY: &str = "TAVILY_API_KEY";

/// API keys, resolved once at process start and handed to the invoker
#[derive(Clone, Default)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub search_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var(GEMINI_API_KEY).ok(),
            search_api_key: std::env::var(SEARCH_API_KEY).ok(),
        }
    }

    fn require(value: &Option<String>, env_var: &str) -> Result<String, ConfigError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .ok_or_else(|| ConfigError::missing(env_var))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("search_api_key", &redact(&self.search_api_key))
            .finish()
    }
}

/// Which model an invocation runs against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelSelection {
    /// Use the model id named in the request
    #[default]
    Requested,
    /// Ignore the requested model id and always use this one
    Pinned(String),
}

impl ModelSelection {
    fn resolve<'a>(&'a self, requested: &'a str) -> &'a str {
        match self {
            ModelSelection::Requested => requested,
            ModelSelection::Pinned(model) => model,
        }
    }
}

/// Everything about an invocation that is fixed for the life of the process
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    pub credentials: Credentials,
    pub gemini_host: String,
    pub temperature: f32,
    pub max_tokens: Option<i32>,
    pub search: SearchConfig,
    pub model_selection: ModelSelection,
    pub max_turns: usize,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            gemini_host: GEMINI_HOST.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            search: SearchConfig::default(),
            model_selection: ModelSelection::default(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl InvokerConfig {
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// One question for the agent, as sent by a chat client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub model_id: String,
    pub conversation: Vec<ConversationTurn>,
    pub allow_search: bool,
    pub system_prompt: String,
    pub provider: String,
}

impl InvocationRequest {
    pub fn new<M, P>(model_id: M, provider: P, conversation: Vec<ConversationTurn>) -> Self
    where
        M: Into<String>,
        P: Into<String>,
    {
        Self {
            model_id: model_id.into(),
            conversation,
            allow_search: false,
            system_prompt: String::new(),
            provider: provider.into(),
        }
    }

    pub fn with_search(mut self, allow_search: bool) -> Self {
        self.allow_search = allow_search;
        self
    }

    pub fn with_system_prompt<S: Into<String>>(mut self, system_prompt: S) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

/// Text of the most recent assistant message, if the agent produced one
pub fn last_assistant_text(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|message| message.is_assistant())
        .map(Message::text)
}

/// The reply a caller sees for a finished run
pub fn extract_reply(messages: &[Message]) -> String {
    last_assistant_text(messages).unwrap_or_else(|| NO_RESPONSE.to_string())
}

pub struct AgentInvoker {
    config: InvokerConfig,
}

impl AgentInvoker {
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Run the agent to completion for one request and return its final reply.
    ///
    /// Nothing is kept between calls; the caller owns any chat history and passes it
    /// back in through `conversation`.
    pub async fn invoke(&self, request: &InvocationRequest) -> Result<String> {
        let Ok(provider_type) = ProviderType::from_str(&request.provider) else {
            tracing::info!(provider = %request.provider, "rejecting unsupported provider");
            return Ok(INVALID_PROVIDER.to_string());
        };

        let agent = self.build_agent(provider_type, request)?;
        let messages = to_messages(&request.conversation);
        if messages.is_empty() {
            return Err(anyhow!("The conversation must contain at least one turn"));
        }

        tracing::info!(
            model = %self.config.model_selection.resolve(&request.model_id),
            allow_search = request.allow_search,
            turns = messages.len(),
            "invoking agent"
        );
        let produced: Vec<Message> = agent.reply(&messages).try_collect().await?;
        tracing::debug!(produced = produced.len(), "agent finished");

        Ok(extract_reply(&produced))
    }

    fn build_agent(&self, provider_type: ProviderType, request: &InvocationRequest) -> Result<Agent> {
        let config = &self.config;

        let provider_config = match provider_type {
            ProviderType::Gemini => ProviderConfig::Gemini(GeminiProviderConfig {
                host: config.gemini_host.clone(),
                api_key: Credentials::require(&config.credentials.gemini_api_key, GEMINI_API_KEY)?,
                model: config.model_selection.resolve(&request.model_id).to_string(),
                temperature: Some(config.temperature),
                max_tokens: config.max_tokens,
            }),
        };

        let search = if request.allow_search {
            SearchConfig {
                api_key: Some(Credentials::require(
                    &config.credentials.search_api_key,
                    SEARCH_API_KEY,
                )?),
                ..config.search.clone()
            }
        } else {
            config.search.clone()
        };

        let mut agent = Agent::new(get_provider(provider_config)?)
            .with_system_prompt(request.system_prompt.clone())
            .with_max_turns(config.max_turns);
        for system in build_tools(request.allow_search, &search)? {
            agent.add_system(system);
        }

        Ok(agent)
    }
}
