use anyhow::Result;

pub mod cliclack;

pub trait Prompt {
    fn render(&mut self, content: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    fn scout_ready(&self) {
        println!("\n");
        println!("Scout is ready! Ask anything, \"/history\" reprints the session, \"exit\" quits.");
        println!("\n");
    }
    // Used for testing. Allows us to downcast to any type.
    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any;
}

#[derive(Debug, PartialEq)]
pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

#[derive(Debug, PartialEq)]
pub enum InputType {
    AskAgain, // Nothing worth sending, prompt again
    Message,  // User sent a message
    History,  // User wants the session so far
    Exit,     // User wants to exit the session
}

impl Input {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        let input_type = if text.is_empty() {
            InputType::AskAgain
        } else if text.eq_ignore_ascii_case("exit") {
            InputType::Exit
        } else if text == "/history" {
            InputType::History
        } else {
            InputType::Message
        };

        let content = (input_type == InputType::Message).then(|| text.to_string());
        Input {
            input_type,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::parse("  ").input_type, InputType::AskAgain);
        assert_eq!(Input::parse("EXIT").input_type, InputType::Exit);
        assert_eq!(Input::parse("/history\n").input_type, InputType::History);

        let message = Input::parse(" What is new in Rust? ");
        assert_eq!(message.input_type, InputType::Message);
        assert_eq!(message.content.as_deref(), Some("What is new in Rust?"));
        assert_eq!(Input::parse("exit").content, None);
    }
}
