use anyhow::Result;
use scout::models::role::Role;

use crate::client::BackendClient;
use crate::history::ChatHistory;
use crate::prompt::{InputType, Prompt};

pub struct Session<'a> {
    client: BackendClient,
    prompt: Box<dyn Prompt + 'a>,
    history: ChatHistory,
}

impl<'a> Session<'a> {
    pub fn new(client: BackendClient, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            client,
            prompt,
            history: ChatHistory::new(),
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.scout_ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Exit => break,
                InputType::AskAgain => continue,
                InputType::History => {
                    if self.history.is_empty() {
                        self.prompt.render("_Nothing said yet._");
                    } else {
                        let transcript = self.history.transcript();
                        self.prompt.render(&transcript);
                    }
                }
                InputType::Message => {
                    let Some(content) = input.content else {
                        continue;
                    };
                    self.history.push(Role::User, content.as_str());

                    self.prompt.show_busy();
                    let reply = self.client.reply(&content).await;
                    self.prompt.hide_busy();

                    self.prompt.render(&reply);
                    self.history.push(Role::Assistant, reply);
                }
            }
        }
        self.prompt.close();
        Ok(())
    }

    #[cfg(test)]
    fn history(&self) -> &ChatHistory {
        &self.history
    }

    #[cfg(test)]
    fn prompt(&self) -> &dyn Prompt {
        self.prompt.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ChatSettings, SERVER_ERROR_REPLY};
    use crate::prompt::Input;
    use serde_json::json;
    use std::collections::VecDeque;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Replays scripted lines and records what was rendered
    struct MockPrompt {
        lines: VecDeque<&'static str>,
        rendered: Vec<String>,
    }

    impl MockPrompt {
        fn new(lines: &[&'static str]) -> Self {
            Self {
                lines: lines.iter().copied().collect(),
                rendered: Vec::new(),
            }
        }
    }

    impl Prompt for MockPrompt {
        fn render(&mut self, content: &str) {
            self.rendered.push(content.to_string());
        }

        fn get_input(&mut self) -> Result<Input> {
            Ok(Input::parse(self.lines.pop_front().unwrap_or("exit")))
        }

        fn show_busy(&mut self) {}
        fn hide_busy(&mut self) {}
        fn close(&self) {}
        fn scout_ready(&self) {}

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(
            format!("{}/chat", server.uri()),
            ChatSettings {
                model_name: "gemini-1.5-flash".to_string(),
                system_prompt: "Be brief.".to_string(),
                allow_search: false,
            },
        )
        .unwrap()
    }

    fn rendered<'s>(session: &'s Session<'_>) -> &'s [String] {
        &session
            .prompt()
            .as_any()
            .downcast_ref::<MockPrompt>()
            .unwrap()
            .rendered
    }

    #[tokio::test]
    async fn test_session_keeps_history_and_reprints_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_partial_json(json!({"messages": ["Hi"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("Hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let prompt = MockPrompt::new(&["Hi", "", "/history", "exit", "never read"]);
        let mut session = Session::new(client_for(&server), Box::new(prompt));
        session.start().await.unwrap();

        assert_eq!(session.history().entries().len(), 2);
        assert_eq!(session.history().entries()[1].role, Role::Assistant);
        assert_eq!(
            rendered(&session),
            &["Hello!".to_string(), "**You:** Hi\n\n**Scout:** Hello!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_backend_failure_does_not_end_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let prompt = MockPrompt::new(&["first", "second"]);
        let mut session = Session::new(client_for(&server), Box::new(prompt));
        session.start().await.unwrap();

        assert_eq!(
            rendered(&session),
            &[SERVER_ERROR_REPLY.to_string(), SERVER_ERROR_REPLY.to_string()]
        );
        assert_eq!(session.history().entries().len(), 4);
    }

    #[tokio::test]
    async fn test_history_before_any_message() {
        let server = MockServer::start().await;

        let prompt = MockPrompt::new(&["/history"]);
        let mut session = Session::new(client_for(&server), Box::new(prompt));
        session.start().await.unwrap();

        assert_eq!(rendered(&session), &["_Nothing said yet._".to_string()]);
    }
}
