//! TOML configuration for storage and logging.
//!
//! # Responsibility
//! - Parse `pim.toml` into typed provider selections.
//! - Resolve relative storage paths against the config file directory.
//!
//! # Invariants
//! - Every `BookConfig::connection` is absolute after loading from a file.
//! - Unknown provider names fail parsing instead of falling back silently.

use crate::storage::ProviderKind;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Storage selection for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookConfig {
    pub provider: ProviderKind,
    pub connection: PathBuf,
}

/// Whole-application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PimConfig {
    /// `trace|debug|info|warn|error`; defaults per build mode.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Absolute log directory; logging stays off when absent.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    pub contacts: BookConfig,
    pub notes: BookConfig,
}

impl PimConfig {
    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            std::env::current_dir()
                .map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .join(base_dir)
        };
        Self::from_toml_str(&text, &base_dir)
    }

    /// Parses config text; relative paths are joined onto `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> ConfigResult<Self> {
        let mut config: Self = toml::from_str(text)?;
        for book in [&mut config.contacts, &mut config.notes] {
            if book.connection.is_relative() {
                book.connection = base_dir.join(&book.connection);
            }
        }
        if let Some(log_dir) = config.log_dir.as_mut() {
            if log_dir.is_relative() {
                *log_dir = base_dir.join(&*log_dir);
            }
        }
        Ok(config)
    }
}
