//! TOML-file preference store.
//!
//! A flat string table under the OS config directory
//! (`~/.config/zabmon/config.toml` on Linux), overridable with the
//! `ZABMON_CONFIG` environment variable. Invalid content falls back to
//! defaults rather than aborting startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing::warn;
use zabmon_core::prefs::PrefStore;

pub struct FilePrefs {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePrefs {
    /// Config file location: `ZABMON_CONFIG` wins, else the OS config dir.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("ZABMON_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not find config directory"))?;
        path.push("zabmon");
        path.push("config.toml");
        Ok(path)
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::config_file_path()?).await
    }

    pub async fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            toml::from_str(&content).unwrap_or_else(|e| {
                warn!("invalid config file {}, starting from defaults: {e}", path.display());
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Writes the current values back to disk, creating parent
    /// directories on first save.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = {
            let values = self.values.lock().unwrap();
            toml::to_string_pretty(&*values)?
        };
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

impl PrefStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}
