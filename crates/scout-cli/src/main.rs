mod client;
mod commands;
mod history;
mod prompt;
mod session;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use client::DEFAULT_BACKEND_URL;
use scout::providers::configs::GEMINI_MODEL;
use scout::providers::factory::ProviderType;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a smart, friendly, and helpful AI assistant.";

fn gemini_models() -> PossibleValuesParser {
    PossibleValuesParser::new(ProviderType::Gemini.models().iter().copied())
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the agent through a running scoutd
    Chat {
        /// Backend chat endpoint
        #[arg(short, long, default_value = DEFAULT_BACKEND_URL)]
        url: String,

        /// Gemini model to use
        #[arg(short, long, default_value = GEMINI_MODEL, value_parser = gemini_models())]
        model: String,

        /// Do not let the agent search the web
        #[arg(long)]
        no_search: bool,

        /// Instruction that steers the agent
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system_prompt: String,
    },

    /// Ask a single question without a server
    Ask {
        /// The question, words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Gemini model to use
        #[arg(short, long, default_value = GEMINI_MODEL, value_parser = gemini_models())]
        model: String,

        /// Model provider name
        #[arg(short, long, default_value = "Gemini")]
        provider: String,

        /// Let the agent search the web
        #[arg(long)]
        search: bool,

        /// Instruction that steers the agent
        #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
        system_prompt: String,

        /// Gemini API key (can also be set via GEMINI_API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Quiet unless RUST_LOG asks otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Chat {
            url,
            model,
            no_search,
            system_prompt,
        } => commands::chat::execute(url, model, !no_search, system_prompt).await,
        Command::Ask {
            prompt,
            model,
            provider,
            search,
            system_prompt,
            api_key,
        } => {
            let options = commands::ask::AskOptions {
                prompt: prompt.join(" "),
                model,
                provider,
                search,
                system_prompt,
                api_key,
            };
            commands::ask::execute(options).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_must_be_a_known_gemini_model() {
        let cli = Cli::try_parse_from(["scout", "ask", "--model", "gemini-1.5-pro", "hi"]).unwrap();
        match cli.command {
            Command::Ask { model, prompt, .. } => {
                assert_eq!(model, "gemini-1.5-pro");
                assert_eq!(prompt, vec!["hi"]);
            }
            _ => panic!("expected ask"),
        }

        assert!(Cli::try_parse_from(["scout", "chat", "--model", "gpt-4o"]).is_err());
        assert!(Cli::try_parse_from(["scout", "ask", "-m", "gemini-ultra", "hi"]).is_err());
    }

    #[test]
    fn test_chat_defaults() {
        let cli = Cli::try_parse_from(["scout", "chat"]).unwrap();
        match cli.command {
            Command::Chat {
                url,
                model,
                no_search,
                system_prompt,
            } => {
                assert_eq!(url, DEFAULT_BACKEND_URL);
                assert_eq!(model, GEMINI_MODEL);
                assert!(!no_search);
                assert_eq!(system_prompt, DEFAULT_SYSTEM_PROMPT);
            }
            _ => panic!("expected chat"),
        }
    }
}
