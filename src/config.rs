use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::memory::{PROJECTS_FILE, TASKS_FILE};

pub const CONFIG_VERSION: u64 = 1;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("ticklist")
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

/// Location of the config file: `~/.config/ticklist/config.json` on Linux.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("ticklist")
        .join("config.json")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TicklistConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    pub data_directory: PathBuf,
    pub debug_logging: bool,
}

impl Default for TicklistConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_directory: default_data_dir(),
            debug_logging: false,
        }
    }
}

impl TicklistConfig {
    /// Read the config at `path`, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_directory.join(TASKS_FILE)
    }

    pub fn projects_path(&self) -> PathBuf {
        self.data_directory.join(PROJECTS_FILE)
    }

    /// Ensure the data directory and its files exist.
    pub fn ensure_files(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)?;

        for path in [self.tasks_path(), self.projects_path()] {
            if !path.exists() {
                std::fs::write(&path, "[]\n")?;
            }
        }

        Ok(())
    }
}
