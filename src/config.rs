//! Runtime configuration
//!
//! The data directory comes from `ASTROLOGER_DATA_DIR` or the platform data
//! directory. An optional `config.json` inside it holds default chart settings:
//!
//! ```json
//! { "defaults": { "houses": "koch", "aspect_types": ["major", "minor"] } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::charts::Settings;
use crate::error::Result;

pub const DATA_DIR_ENV: &str = "ASTROLOGER_DATA_DIR";
const CONFIG_FILE: &str = "config.json";
const CHARTS_FILE: &str = "charts.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    defaults: Settings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Settings applied to charts when a request does not override them
    pub defaults: Settings,
}

impl Config {
    /// Load configuration from the environment and the data directory
    pub fn load() -> Result<Self> {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self::load_from(data_dir)
    }

    /// Load configuration rooted at `data_dir`
    pub fn load_from(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let config_path = data_dir.join(CONFIG_FILE);

        let file = if config_path.exists() {
            let data = fs::read_to_string(&config_path)?;
            tracing::info!(path = %config_path.display(), "Loaded configuration");
            serde_json::from_str(&data)?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            data_dir,
            defaults: file.defaults,
        })
    }

    /// Path of the chart store
    pub fn charts_path(&self) -> PathBuf {
        self.data_dir.join(CHARTS_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "astrologer", "astrologer") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        // Fallback to current directory
        Path::new(".").to_path_buf()
    }
}
