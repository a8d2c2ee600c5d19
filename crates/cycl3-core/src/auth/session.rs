use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// The authenticated identity returned by `com.atproto.server.createSession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub did: String,
    pub handle: String,
    pub email: Option<String>,
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub created_at: DateTime<Utc>,
}

/// Owner of the single active session.
///
/// The session lives in memory and is mirrored to `session.json` so it
/// survives restarts. Nothing here re-validates tokens.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache_dir: PathBuf,
    data: Option<Session>,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns true if one was restored.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session file")?;
        let data: Session = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        debug!(handle = %data.handle, "Session restored from disk");
        self.data = Some(data);
        Ok(true)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents).context("Failed to write session file")?;
        }
        Ok(())
    }

    /// Drop the session from memory and disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    /// Replace the active session
    pub fn update(&mut self, data: Session) {
        self.data = Some(data);
    }

    pub fn current(&self) -> Option<&Session> {
        self.data.as_ref()
    }

    pub fn handle(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.handle.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
