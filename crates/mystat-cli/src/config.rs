//! Persisted CLI preferences.
//!
//! `config.json` under the platform config dir keeps the last username and
//! the preferred response language. Cached sessions live apart from it in
//! a per-user cache directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mystat";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_username: Option<String>,
    pub language: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::read_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::config_path()?)
    }

    /// Remember a successful login so the next run can skip the username prompt
    pub fn remember(&mut self, username: &str, language: &str) {
        self.last_username = Some(username.to_string());
        self.language = Some(language.to_string());
    }

    /// Per-user session cache directory, so switching accounts never reuses
    /// another student's token.
    pub fn session_dir(username: &str) -> Result<PathBuf> {
        let base = dirs::cache_dir().context("No cache directory on this platform")?;
        Ok(Self::session_dir_in(&base, username))
    }

    fn session_dir_in(base: &Path, username: &str) -> PathBuf {
        let safe: String = username
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        base.join(APP_NAME).join("sessions").join(safe)
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("No config directory on this platform")?;
        Ok(base.join(APP_NAME).join(CONFIG_FILE))
    }

    fn read_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Malformed config at {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_remembered_login_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.remember("student", "uk_UA");
        config.write_to(&path).unwrap();

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded.last_username.as_deref(), Some("student"));
        assert_eq!(loaded.language.as_deref(), Some("uk_UA"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::read_from(&path).is_err());
    }

    #[test]
    fn test_session_dir_is_per_user() {
        let base = Path::new("/cache");
        let alice = Config::session_dir_in(base, "alice");
        let bob = Config::session_dir_in(base, "bob");
        assert_ne!(alice, bob);
        assert!(alice.ends_with("mystat/sessions/alice"));
        assert!(Config::session_dir_in(base, "../x").ends_with("sessions/.._x"));
    }
}
