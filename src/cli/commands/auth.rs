use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_session, save_session};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account on the current server")]
    Signup {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (falls back to SHELF_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Login and store the issued token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (falls back to SHELF_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        AuthCommands::Signup { email, password } => {
            let password = resolve_password(password)?;
            let user = session.client().signup(&email, &password).await?;
            output_success(
                &output_format,
                &format!("Created account {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let mut client_session = session.session();
            client_session.login(&email, &password).await?;

            let token = client_session.token().unwrap_or_default().to_string();
            session.set_login(&email, &token);
            save_session(&session)?;
            output_success(
                &output_format,
                &format!("Logged in as {}", email),
                Some(json!({ "email": email, "server_url": session.server_url })),
            )
        }
        AuthCommands::Logout => {
            session.clear_login();
            save_session(&session)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = session.token.is_some();
            let message = match (&session.email, authenticated) {
                (Some(email), true) => format!("Logged in as {} on {}", email, session.server_url),
                _ => format!("Not logged in on {}", session.server_url),
            };
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "authenticated": authenticated,
                    "email": session.email,
                    "server_url": session.server_url,
                    "logged_in_at": session.logged_in_at,
                })),
            )
        }
    }
}

fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    password
        .or_else(|| std::env::var("SHELF_PASSWORD").ok())
        .ok_or_else(|| anyhow::anyhow!("password required: pass --password or set SHELF_PASSWORD"))
}
