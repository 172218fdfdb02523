use arjun_server::ScanMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional project config file.
pub const CONFIG_FILE_NAME: &str = "arjun.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", config_path.display())]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", config_path.display())]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from `arjun.toml`. Every field is optional; command line
/// arguments take precedence.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub content_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub scan: Option<ScanMode>,
    pub editor_path: Option<String>,
    pub allowed_extensions: Option<Vec<String>>,
    pub auto_save: Option<bool>,
    pub save_delay: Option<u64>,
}

impl FileConfig {
    /// Loads the config file, returning `None` when it does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }
}
