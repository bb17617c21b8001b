use anyhow::Result;
use console::style;

use crate::client::{BackendClient, ChatSettings};
use crate::prompt::cliclack::CliclackPrompt;
use crate::session::Session;

pub async fn execute(
    url: String,
    model_name: String,
    allow_search: bool,
    system_prompt: String,
) -> Result<()> {
    let client = BackendClient::new(
        url.as_str(),
        ChatSettings {
            model_name,
            system_prompt,
            allow_search,
        },
    )?;

    let settings = client.settings();
    println!(
        "{} {}",
        style("Scout chat").bold().green(),
        style(format!(
            "- {} via {}, web search {}",
            settings.model_name,
            url,
            if settings.allow_search { "on" } else { "off" }
        ))
        .dim()
    );

    let mut session = Session::new(client, Box::new(CliclackPrompt::new()));
    session.start().await
}
