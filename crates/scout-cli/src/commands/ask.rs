use anyhow::Result;
use scout::invoker::{AgentInvoker, Credentials, InvocationRequest, InvokerConfig};
use scout::models::conversation::ConversationTurn;

pub struct AskOptions {
    pub prompt: String,
    pub model: String,
    pub provider: String,
    pub search: bool,
    pub system_prompt: String,
    pub api_key: Option<String>,
}

impl AskOptions {
    fn credentials(&self) -> Credentials {
        let mut credentials = Credentials::from_env();
        if let Some(key) = &self.api_key {
            credentials.gemini_api_key = Some(key.clone());
        }
        credentials
    }

    fn request(&self) -> InvocationRequest {
        InvocationRequest::new(
            self.model.as_str(),
            self.provider.as_str(),
            vec![ConversationTurn::user(self.prompt.as_str())],
        )
        .with_search(self.search)
        .with_system_prompt(self.system_prompt.as_str())
    }
}

pub async fn execute(options: AskOptions) -> Result<()> {
    let invoker = AgentInvoker::new(InvokerConfig::default().with_credentials(options.credentials()));
    let reply = invoker.invoke(&options.request()).await?;
    println!("{}", reply);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AskOptions {
        AskOptions {
            prompt: "What is Rust?".to_string(),
            model: "gemini-1.5-pro".to_string(),
            provider: "Gemini".to_string(),
            search: true,
            system_prompt: "Be brief.".to_string(),
            api_key: Some("from-flag".to_string()),
        }
    }

    #[test]
    fn test_flag_key_wins() {
        let credentials = options().credentials();
        assert_eq!(credentials.gemini_api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_request_from_options() {
        let request = options().request();
        assert_eq!(request.model_id, "gemini-1.5-pro");
        assert_eq!(request.provider, "Gemini");
        assert!(request.allow_search);
        assert_eq!(request.system_prompt, "Be brief.");
        assert_eq!(request.conversation, vec![ConversationTurn::user("What is Rust?")]);
    }

    #[tokio::test]
    async fn test_unknown_provider_prints_sentinel_without_key() {
        let mut options = options();
        options.provider = "OpenAI".to_string();
        options.api_key = None;

        // The sentinel comes back before any key or network is needed
        let invoker = AgentInvoker::new(InvokerConfig::default());
        let reply = invoker.invoke(&options.request()).await.unwrap();
        assert_eq!(reply, "Invalid provider");
    }
}
