//! Settings persistence.
//!
//! The configuration lives in a small JSON document keyed by the persisted setting names
//! (`geminiKey`, `modelProvider`, ...). Absent keys read back as their defaults.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::settings::{Configuration, SettingsError, SettingsStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed settings store.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/agreement_lens/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("agreement_lens");
            p.push("settings.json");
            p
        })
    }

    pub fn at_default_location() -> Result<Self, SettingsError> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| SettingsError::Unavailable("no config directory on this system".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read(&self) -> Result<Configuration, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Configuration::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(Configuration::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&self, config: &Configuration) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self) -> Result<Configuration, SettingsError> {
        self.read()
    }

    async fn set(&self, config: &Configuration) -> Result<(), SettingsError> {
        self.write(config)
    }
}

/// In-memory store, used where no persistence is wanted.
#[derive(Default)]
pub struct MemorySettingsStore {
    config: Mutex<Configuration>,
}

impl MemorySettingsStore {
    pub fn new(config: Configuration) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self::new(Configuration {
            api_key: key.into(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self) -> Result<Configuration, SettingsError> {
        Ok(self.config.lock().clone())
    }

    async fn set(&self, config: &Configuration) -> Result<(), SettingsError> {
        *self.config.lock() = config.clone();
        Ok(())
    }
}
