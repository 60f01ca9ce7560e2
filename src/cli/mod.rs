pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ClientError;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf CLI - Command-line client for the product API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Select and check the API server")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Account creation and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Manage your products")]
    Product {
        #[command(subcommand)]
        cmd: commands::product::ProductCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json && !cli.text {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Product { cmd } => commands::product::handle(cmd, output_format).await,
    }
}

/// Machine-readable code for a failed command, if it came from the API
pub fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    let client_err = err.downcast_ref::<ClientError>()?;
    if let ClientError::Unauthenticated = client_err {
        return Some("UNAUTHORIZED");
    }
    match client_err.status()?.as_u16() {
        400 => Some("VALIDATION_ERROR"),
        401 => Some("UNAUTHORIZED"),
        403 => Some("FORBIDDEN"),
        404 => Some("NOT_FOUND"),
        409 => Some("CONFLICT"),
        503 => Some("SERVICE_UNAVAILABLE"),
        _ => Some("INTERNAL_SERVER_ERROR"),
    }
}
