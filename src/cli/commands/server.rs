use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_session, save_session};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at an API server")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:5000")]
        url: String,
    },

    #[command(about = "Show the currently selected server")]
    Current,

    #[command(about = "Check server health via the /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        ServerCommands::Use { url } => {
            let parsed = url::Url::parse(&url).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", url, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("server URL must use http or https");
            }

            session.set_server(&url);
            save_session(&session)?;
            output_success(
                &output_format,
                &format!("Using server {}", session.server_url),
                Some(json!({ "server_url": session.server_url })),
            )
        }
        ServerCommands::Current => output_success(
            &output_format,
            &format!("Current server: {}", session.server_url),
            Some(json!({ "server_url": session.server_url })),
        ),
        ServerCommands::Health => {
            let health = session.client().health().await?;
            let status = health["data"]["status"].as_str().unwrap_or("unknown");
            output_success(
                &output_format,
                &format!("{} is {}", session.server_url, status),
                Some(json!({ "health": health })),
            )
        }
    }
}
