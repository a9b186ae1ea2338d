//! Operator preferences backed by SQLite: which models to call and the
//! default drafting tone. Generated content is never stored here.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use crate::generator::Tone;
use crate::generator::gemini::Models;

pub const KEY_TONE: &str = "tone";
pub const KEY_DISCOVER_MODEL: &str = "model.discover";
pub const KEY_DRAFT_MODEL: &str = "model.draft";
pub const KEY_IMAGE_MODEL: &str = "model.image";

/// Persistent key-value preference store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the preferences table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path).context("failed to open preferences database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS preferences (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create preferences table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM preferences WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM preferences WHERE key = ?1", [key])?;
        Ok(())
    }

    /// The stored default tone. An unparseable value reads as unset.
    pub fn tone(&self) -> Result<Option<Tone>> {
        Ok(self.get(KEY_TONE)?.and_then(|v| v.parse().ok()))
    }

    pub fn set_tone(&self, tone: Tone) -> Result<()> {
        self.set(KEY_TONE, tone.label())
    }

    /// Models to use: `overrides` first, then stored values, then built-in defaults.
    pub fn models(&self, overrides: ModelOverrides) -> Result<Models> {
        let defaults = Models::default();
        Ok(Models {
            discover: self.resolve(overrides.discover, KEY_DISCOVER_MODEL, defaults.discover)?,
            draft: self.resolve(overrides.draft, KEY_DRAFT_MODEL, defaults.draft)?,
            image: self.resolve(overrides.image, KEY_IMAGE_MODEL, defaults.image)?,
        })
    }

    fn resolve(&self, value: Option<String>, key: &str, default: String) -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None => Ok(self.get(key)?.unwrap_or(default)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))
    }
}

/// Per-operation model ids given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ModelOverrides {
    pub discover: Option<String>,
    pub draft: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(KEY_DRAFT_MODEL, "old").unwrap();
        config.set(KEY_DRAFT_MODEL, "new").unwrap();
        assert_eq!(config.get(KEY_DRAFT_MODEL).unwrap().unwrap(), "new");
    }

    #[test]
    fn remove_deletes_key() {
        let config = mem_config();
        config.set(KEY_TONE, "Technical").unwrap();
        config.remove(KEY_TONE).unwrap();
        assert!(config.get(KEY_TONE).unwrap().is_none());
        config.remove(KEY_TONE).unwrap();
    }

    #[test]
    fn tone_round_trip() {
        let config = mem_config();
        assert!(config.tone().unwrap().is_none());
        config.set_tone(Tone::BeginnerFriendly).unwrap();
        assert_eq!(config.tone().unwrap(), Some(Tone::BeginnerFriendly));
    }

    #[test]
    fn garbage_tone_reads_as_unset() {
        let config = mem_config();
        config.set(KEY_TONE, "sarcastic").unwrap();
        assert!(config.tone().unwrap().is_none());
    }

    #[test]
    fn models_default_when_nothing_stored() {
        let config = mem_config();
        assert_eq!(
            config.models(ModelOverrides::default()).unwrap(),
            Models::default()
        );
    }

    #[test]
    fn models_precedence() {
        let config = mem_config();
        config.set(KEY_DISCOVER_MODEL, "stored-flash").unwrap();
        config.set(KEY_DRAFT_MODEL, "stored-pro").unwrap();

        let models = config
            .models(ModelOverrides {
                draft: Some("flag-pro".to_string()),
                ..ModelOverrides::default()
            })
            .unwrap();

        assert_eq!(models.discover, "stored-flash");
        assert_eq!(models.draft, "flag-pro");
        assert_eq!(models.image, Models::default().image);
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set_tone(Tone::Skeptical).unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.tone().unwrap(), Some(Tone::Skeptical));
        }
    }
}
