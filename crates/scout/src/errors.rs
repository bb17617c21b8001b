use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a tool call can produce. These travel inside messages so the model can read them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("The provided function name '{0}' had invalid characters, it must match this regex [a-zA-Z0-9_-]+")]
    InvalidToolName(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Deployment problems that make an invocation impossible, as opposed to a bad request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{env_var} is missing")]
    MissingCredential { env_var: String },
}

impl ConfigError {
    pub fn missing(env_var: &str) -> Self {
        ConfigError::MissingCredential {
            env_var: env_var.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::missing("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "GEMINI_API_KEY is missing");
    }

    #[test]
    fn test_agent_error_serialization() {
        let err = AgentError::ToolNotFound("search__nope".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: AgentError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
