use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "RPC_BASEURL";
const CONFIG_ENV: &str = "RPC_CLIENT_CONFIG_DIR";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to determine configuration directory")]
    MissingDirectory,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("{0}")]
    TomlDe(#[from] toml::de::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct RawConfig {
    base_url: String,
}

/// Where a resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    File,
    Unset,
}

/// Configuration the shared client is built from.
///
/// `base_url` is kept verbatim. It is never validated, so an empty or
/// malformed value only shows up as an error once a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub source: ConfigSource,
}

impl ClientConfig {
    /// Configuration as if `RPC_BASEURL` held `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            source: ConfigSource::Environment,
        }
    }

    /// Resolve against the process environment and the default config directory.
    pub fn load() -> Self {
        let manager = match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(err) => {
                log::debug!("no configuration directory available: {err}");
                None
            }
        };
        Self::resolve(|key| env::var(key).ok(), manager.as_ref())
    }

    /// `RPC_BASEURL` wins, then the saved `config.toml`, else an empty base URL.
    pub fn resolve<F>(lookup: F, manager: Option<&ConfigManager>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            return Self {
                base_url,
                source: ConfigSource::Environment,
            };
        }

        if let Some(manager) = manager {
            match manager.load_base_url() {
                Ok(base_url) => {
                    return Self {
                        base_url,
                        source: ConfigSource::File,
                    }
                }
                Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => log::warn!(
                    "ignoring unreadable config file {}: {err}",
                    manager.config_file().display()
                ),
            }
        }

        Self {
            base_url: String::new(),
            source: ConfigSource::Unset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        let dir = determine_base_dir()?;
        Ok(Self { base_dir: dir })
    }

    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn save_base_url(&self, base_url: &str) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base_dir)?;
        let config = RawConfig {
            base_url: base_url.to_string(),
        };
        let contents = toml::to_string(&config)?;
        fs::write(self.config_file(), contents)?;
        Ok(())
    }

    pub fn load_base_url(&self) -> Result<String, ConfigError> {
        let contents = fs::read_to_string(self.config_file())?;
        let config: RawConfig = toml::from_str(&contents)?;
        Ok(config.base_url)
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }
}

fn determine_base_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("dev", "rpc-client", "rpc-client")
        .ok_or(ConfigError::MissingDirectory)?;
    Ok(dirs.config_dir().to_path_buf())
}
