use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ProductClient, Session};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

const SESSION_FILE: &str = "session.json";

/// Everything the CLI remembers between invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliSession {
    pub server_url: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for CliSession {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            email: None,
            token: None,
            logged_in_at: None,
        }
    }
}

impl CliSession {
    pub fn client(&self) -> ProductClient {
        ProductClient::new(self.server_url.clone())
    }

    /// Client session state seeded with the persisted token
    pub fn session(&self) -> Session {
        Session::with_token(self.client(), self.token.clone())
    }

    pub fn set_login(&mut self, email: &str, token: &str) {
        self.email = Some(email.to_string());
        self.token = Some(token.to_string());
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear_login(&mut self) {
        self.email = None;
        self.token = None;
        self.logged_in_at = None;
    }

    /// Switching servers invalidates any token issued by the previous one
    pub fn set_server(&mut self, url: &str) {
        let url = url.trim_end_matches('/').to_string();
        if url != self.server_url {
            self.clear_login();
        }
        self.server_url = url;
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let file = dir.join(SESSION_FILE);
        if !file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&file)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("corrupt session file {}: {}", file.display(), e))?;
        Ok(session)
    }

    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SESSION_FILE), content)?;
        Ok(())
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("SHELF_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("shelf").join("cli"))
}

pub fn load_session() -> anyhow::Result<CliSession> {
    CliSession::load_from(&get_config_dir()?)
}

pub fn save_session(session: &CliSession) -> anyhow::Result<()> {
    session.save_to(&get_config_dir()?)
}
