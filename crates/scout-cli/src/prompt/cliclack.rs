use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use console::style;

use super::{Input, InputType, Prompt};

pub struct CliclackPrompt {
    spinner: cliclack::ProgressBar,
    theme: &'static str,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: spinner(),
            theme: "GitHub",
        }
    }
}

fn print_markdown(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();

    if let Err(e) = printed {
        tracing::debug!(error = %e, "falling back to plain output");
        println!("{}", content);
    }
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, content: &str) {
        print_markdown(content, self.theme);
        println!();
    }

    fn get_input(&mut self) -> Result<Input> {
        let raw: String = match input("Message:").placeholder("").multiline().interact() {
            Ok(text) => text,
            // Ctrl-C / Esc ends the session like "exit"
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                })
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Input::parse(&raw))
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("Thinking...");
    }

    fn hide_busy(&mut self) {
        self.spinner.stop("");
    }

    fn close(&self) {
        println!("{}", style("Session closed.").dim());
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
