//! Configuration management for the snippet engine.
//!
//! Loads configuration from TOML files and provides runtime defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::formatter::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub platforms: PlatformsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether snippets are produced at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Language of labels, placeholders and notices
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Character budget for selections on video pages
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Truncate selections on video sites and inside video links
    #[serde(default = "default_true")]
    pub truncate_on_video_sites: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            truncate_on_video_sites: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformsConfig {
    /// Additional host substrings treated as video sites
    #[serde(default)]
    pub extra_video_sites: Vec<String>,

    /// Additional iframe hosts treated as video embeds
    #[serde(default)]
    pub extra_embed_hosts: Vec<String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_chars() -> usize {
    500
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_config_path())
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: PathBuf) -> Self {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file at {:?}, using defaults", path);
                return Self::default();
            }
            Err(e) => {
                warn!("Cannot read {:?}: {}, using defaults", path, e);
                return Self::default();
            }
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            warn!("Invalid config {:?}: {}, using defaults", path, e);
            Self::default()
        })
    }

    /// `<config dir>/websnip/config.toml`
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("websnip").join("config.toml")
    }

    /// Write this configuration as TOML, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> std::io::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, contents)?;
        info!("Wrote configuration to {:?}", path);
        Ok(())
    }
}
