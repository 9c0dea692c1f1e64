//! Configuration store with durable key-value persistence.

use crate::config::{ConfigUpdate, GameConfig};
use crate::error::Result;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Storage key of the persisted configuration record
pub const CONFIG_STORAGE_KEY: &str = "flower-field-config";

const RECORD_VERSION: u32 = 0;

/// Durable string-valued key-value storage
pub trait ConfigStorage {
    /// Read the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ConfigStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written record
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        debug!("Saved {} to {:?}", key, path);
        Ok(())
    }
}

/// In-process storage, used by tests and ephemeral runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl ConfigStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}

/// Stored layout: the parameters wrapped with a format version
#[derive(Debug, Serialize, Deserialize)]
struct PersistedConfig {
    state: GameConfig,
    version: u32,
}

/// Owns the live configuration and writes it through to storage.
///
/// Updates are not validated: out-of-range values are stored as given.
pub struct ConfigStore<S: ConfigStorage> {
    config: GameConfig,
    storage: S,
}

impl<S: ConfigStorage> ConfigStore<S> {
    /// Load the persisted configuration, falling back to defaults
    pub fn open(storage: S) -> Self {
        Self::open_with_palette(storage, Palette::default())
    }

    pub fn open_with_palette(storage: S, palette: Palette) -> Self {
        let mut config = match Self::read_record(&storage) {
            Ok(Some(config)) => {
                info!("Loaded configuration from {}", CONFIG_STORAGE_KEY);
                config
            }
            Ok(None) => {
                info!("No stored configuration, using defaults");
                GameConfig::default()
            }
            Err(e) => {
                warn!("Ignoring unreadable configuration record: {}", e);
                GameConfig::default()
            }
        };
        config.flower_colors = palette;

        Self { config, storage }
    }

    fn read_record(storage: &S) -> Result<Option<GameConfig>> {
        let Some(raw) = storage.load(CONFIG_STORAGE_KEY)? else {
            return Ok(None);
        };

        let record: PersistedConfig = serde_json::from_str(&raw)?;
        if record.version != RECORD_VERSION {
            warn!(
                "Configuration record version {} differs from {}, reading it anyway",
                record.version, RECORD_VERSION
            );
        }
        Ok(Some(record.state))
    }

    /// Current parameters and palette
    pub fn get(&self) -> &GameConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Set one parameter and persist.
    ///
    /// The new value stays applied in memory even when persisting fails.
    #[instrument(skip(self))]
    pub fn update(&mut self, update: ConfigUpdate) -> Result<()> {
        self.config.apply(update);
        info!("Configuration updated: {}", update);
        self.persist()
    }

    /// Restore defaults (palette untouched) and persist
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<()> {
        self.config.reset_parameters();
        info!("Configuration reset to defaults");
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let record = PersistedConfig {
            state: self.config.clone(),
            version: RECORD_VERSION,
        };
        let json = serde_json::to_string(&record)?;
        self.storage.save(CONFIG_STORAGE_KEY, &json)
    }
}
