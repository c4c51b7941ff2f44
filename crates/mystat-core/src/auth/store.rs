use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::SessionData;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// A session persisted between runs, tagged with the account it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    pub session: SessionData,
}

/// Keeps the last session on disk so a later run can skip the login call.
pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Load the stored session for `username` if it exists and has not expired
    pub fn load(&self, username: &str) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let stored: StoredSession =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        if stored.username != username || stored.session.is_expired() {
            return Ok(None);
        }
        Ok(Some(stored.session))
    }

    /// Save session to disk
    pub fn save(&self, username: &str, session: &SessionData) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            username: username.to_string(),
            session: session.clone(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Clear session data
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::now_millis;

    fn session(expires_at: i64) -> SessionData {
        SessionData {
            access_token: "token".to_string(),
            expires_at,
            language: "en".to_string(),
            group_id: Some(11),
        }
    }

    #[test]
    fn test_save_then_load_for_same_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested"));
        let data = session(now_millis() + 60_000);

        store.save("student", &data).unwrap();
        assert_eq!(store.load("student").unwrap(), Some(data));
    }

    #[test]
    fn test_other_user_or_expired_session_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save("student", &session(now_millis() + 60_000)).unwrap();
        assert_eq!(store.load("someone-else").unwrap(), None);

        store.save("student", &session(now_millis() - 1)).unwrap();
        assert_eq!(store.load("student").unwrap(), None);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.load("student").unwrap(), None);

        store.save("student", &session(now_millis() + 60_000)).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load("student").unwrap(), None);
        store.clear().unwrap();
    }
}
