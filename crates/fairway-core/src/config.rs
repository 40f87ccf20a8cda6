//! Application configuration management.
//!
//! Holds the course ratings used for handicap math, the default course
//! name for new rounds, the pin location and the club bag.
//!
//! Configuration is stored at `~/.config/fairway/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::handicap::RatingConfig;
use crate::models::{ClubSet, Coordinate, DEFAULT_HOLE};

/// Application name used for config/data directory paths
const APP_NAME: &str = "fairway";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "FAIRWAY_DATA_DIR";

const DEFAULT_COURSE: &str = "Minnehaha Creek";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub ratings: RatingConfig,
    pub course_name: String,
    pub hole: Coordinate,
    pub clubs: ClubSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            ratings: RatingConfig::default(),
            course_name: DEFAULT_COURSE.to_string(),
            hole: DEFAULT_HOLE,
            clubs: ClubSet::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config in {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where sessions and user documents live.
    /// `FAIRWAY_DATA_DIR` wins over the config file, which wins over the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
