//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use tracing::info;

use crate::auth::AuthManager;
use crate::core::app::AppSettings;
use crate::core::config::Config;
use crate::core::response_client::{ResponseClient, ResponseSource};

pub async fn run_say(
    prompt: Vec<String>,
    model: Option<String>,
    auth_manager: &AuthManager,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Usage: chatline say <prompt>");
        std::process::exit(1);
    }

    let config = Config::load()?;
    let (api_key, key_source) = match auth_manager.resolve_api_key() {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let settings = AppSettings::from_config(&config, model.as_deref());
    let client = ResponseClient::new(
        reqwest::Client::new(),
        config.base_url(),
        settings.model,
        api_key,
    );

    info!(model = client.model(), key_source = key_source.describe(), "One-shot prompt");
    let reply = client.fetch_response(prompt).await;
    write_reply(&mut io::stdout().lock(), &reply)?;
    Ok(())
}

fn write_reply(out: &mut impl Write, reply: &str) -> io::Result<()> {
    writeln!(out, "{}", reply.trim_end())?;
    out.flush()
}
