use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Identity;
use crate::models::UserId;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

/// The signed-in user, remembered between runs.
pub struct Session {
    data_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns whether a user is signed in.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;
            debug!(user = %data.user_id, "Restored session");
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Select the active user and persist the choice.
    pub fn sign_in(&mut self, user_id: UserId, display_name: Option<String>) -> Result<()> {
        info!(user = %user_id, "Signed in");
        self.data = Some(SessionData {
            user_id,
            display_name,
            signed_in_at: Utc::now(),
        });
        self.save()
    }

    /// Forget the active user, on disk as well.
    pub fn sign_out(&mut self) -> Result<()> {
        if let Some(data) = self.data.take() {
            info!(user = %data.user_id, "Signed out");
        }
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.data.is_some()
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

impl Identity for Session {
    fn current_user_id(&self) -> Option<UserId> {
        self.data.as_ref().map(|d| d.user_id.clone())
    }
}
