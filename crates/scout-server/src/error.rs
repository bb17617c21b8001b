use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {env_var}: {message}")]
    InvalidValue { env_var: String, message: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Helper function to format environment variable names
pub fn to_env_var(field_path: &str) -> String {
    // Bare field names come from the invoker section
    let normalized_path = if field_path.starts_with("invoker.") || field_path.starts_with("server.") {
        field_path.to_string()
    } else {
        format!("invoker.{}", field_path)
    };

    format!(
        "SCOUT_{}",
        normalized_path.replace('.', "__").to_uppercase()
    )
}
