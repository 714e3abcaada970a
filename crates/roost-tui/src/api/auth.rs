use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bearer tokens for the external identity provider, persisted across runs
/// so the client starts authenticated when a prior session left a valid
/// refresh token behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: Uuid,
}

impl AuthTokens {
    fn session_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("roost");

        fs::create_dir_all(&config_dir).context("Could not create config directory")?;

        Ok(config_dir.join("session.json"))
    }

    pub fn load() -> Result<Option<Self>> {
        let path = Self::session_path()?;
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).context("Could not read session file")?;
        let tokens = serde_json::from_str(&contents).context("Could not parse session file")?;
        Ok(Some(tokens))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::session_path()?;
        let contents =
            serde_json::to_string_pretty(self).context("Could not serialize session")?;
        fs::write(&path, contents).context("Could not write session file")?;
        Ok(())
    }

    pub fn delete() -> Result<()> {
        let path = Self::session_path()?;
        if path.exists() {
            fs::remove_file(&path).context("Could not delete session file")?;
        }
        Ok(())
    }
}
