//! Persistent session state (token + profile).
//!
//! The session is the only process-wide mutable resource: login, register,
//! and OAuth write it, every authenticated request reads it, and logout
//! removes it. It persists as a JSON file so a new process restores the
//! previous sign-in on startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::{Token, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Profile fetched after sign-in. Absent when `/users/me` failed.
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn from_token(token: Token) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            user: None,
        }
    }
}

/// Resolve where the session file lives: `auth.session_file` from config,
/// otherwise `<platform config dir>/deepr/session.json`.
pub fn session_path(config: &Config) -> PathBuf {
    if let Some(path) = &config.auth.session_file {
        return path.clone();
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deepr")
        .join("session.json")
}

/// Restore a previously saved session, if any.
pub fn load(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    let session =
        serde_json::from_str(&content).with_context(|| "Failed to parse session file")?;
    Ok(Some(session))
}

/// Load the session or explain how to obtain one.
pub fn require(path: &Path) -> Result<Session> {
    load(path)?.ok_or_else(|| anyhow::anyhow!("not signed in — run `deepr login` first"))
}

pub fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(session)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write session file: {}", path.display()))?;
    Ok(())
}

/// Remove the session file. Returns whether one existed.
pub fn clear(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        Session {
            access_token: "tok-123".to_string(),
            token_type: "bearer".to_string(),
            user: Some(User {
                id: 7,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                created_at: "2025-05-01T09:00:00".to_string(),
            }),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("session.json");

        save(&path, &sample_session()).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.access_token, "tok-123");
        assert_eq!(loaded.user.unwrap().email, "ada@example.com");
    }

    #[test]
    fn missing_file_loads_as_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load(&tmp.path().join("session.json")).unwrap().is_none());
    }

    #[test]
    fn require_fails_without_session() {
        let tmp = TempDir::new().unwrap();
        let err = require(&tmp.path().join("session.json")).unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    }

    #[test]
    fn clear_reports_whether_a_session_existed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        assert!(!clear(&path).unwrap());

        save(&path, &sample_session()).unwrap();
        assert!(clear(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn token_type_defaults_when_absent() {
        let session: Session =
            serde_json::from_str(r#"{"access_token": "tok"}"#).unwrap();
        assert_eq!(session.token_type, "bearer");
        assert!(session.user.is_none());
    }

    #[test]
    fn config_override_wins_over_platform_dir() {
        let mut config = Config::default();
        config.auth.session_file = Some(PathBuf::from("/tmp/custom-session.json"));
        assert_eq!(
            session_path(&config),
            PathBuf::from("/tmp/custom-session.json")
        );
    }
}
