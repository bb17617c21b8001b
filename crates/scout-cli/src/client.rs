use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:9999/chat";
pub const SERVER_ERROR_REPLY: &str = "Error: Unable to get response from server";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The body the backend's /chat route expects
#[derive(Debug, Serialize)]
pub struct ChatPayload<'a> {
    pub model_name: &'a str,
    pub model_provider: &'a str,
    pub system_prompt: &'a str,
    pub messages: Vec<&'a str>,
    pub allow_search: bool,
}

/// Session-wide choices sent along with every message
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model_name: String,
    pub system_prompt: String,
    pub allow_search: bool,
}

pub struct BackendClient {
    client: Client,
    url: String,
    settings: ChatSettings,
}

impl BackendClient {
    pub fn new<S: Into<String>>(url: S, settings: ChatSettings) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            settings,
        })
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    fn payload<'a>(&'a self, input: &'a str) -> ChatPayload<'a> {
        // Only the current turn goes over the wire; history stays local
        ChatPayload {
            model_name: &self.settings.model_name,
            model_provider: "Gemini",
            system_prompt: &self.settings.system_prompt,
            messages: vec![input],
            allow_search: self.settings.allow_search,
        }
    }

    /// Ask the backend for a reply. Failures come back as displayable text.
    pub async fn reply(&self, input: &str) -> String {
        match self.send(input).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(error = ?e, "chat request failed");
                format!("Error: {}", e)
            }
        }
    }

    async fn send(&self, input: &str) -> reqwest::Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(input))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "backend refused chat request");
            return Ok(SERVER_ERROR_REPLY.to_string());
        }

        Ok(match response.json::<Value>().await? {
            Value::String(reply) => reply,
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> ChatSettings {
        ChatSettings {
            model_name: "gemini-1.5-pro".to_string(),
            system_prompt: "Be brief.".to_string(),
            allow_search: true,
        }
    }

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(format!("{}/chat", server.uri()), settings()).unwrap()
    }

    #[tokio::test]
    async fn test_posts_only_the_current_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({
                "model_name": "gemini-1.5-pro",
                "model_provider": "Gemini",
                "system_prompt": "Be brief.",
                "messages": ["What is Rust?"],
                "allow_search": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("A language.")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).reply("What is Rust?").await;
        assert_eq!(reply, "A language.");
    }

    #[tokio::test]
    async fn test_non_ok_status_is_fixed_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "GEMINI_API_KEY is missing"})),
            )
            .mount(&server)
            .await;

        let reply = client_for(&server).reply("Hello").await;
        assert_eq!(reply, SERVER_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_sentinel_replies_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("Invalid provider")))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).reply("Hello").await, "Invalid provider");
    }

    #[tokio::test]
    async fn test_transport_error_is_reported_as_text() {
        // Nothing listens here once the server is dropped
        let url = {
            let server = MockServer::start().await;
            format!("{}/chat", server.uri())
        };

        let client = BackendClient::new(url, settings()).unwrap();
        let reply = client.reply("Hello").await;
        assert!(reply.starts_with("Error: "));
        assert_ne!(reply, SERVER_ERROR_REPLY);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_reported_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let reply = client_for(&server).reply("Hello").await;
        assert!(reply.starts_with("Error: "));
    }
}
