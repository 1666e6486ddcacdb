//! Configuration handling for lendbook
//!
//! Configuration is read from an explicit path or from
//! `~/.config/lendbook/library.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::seed::{BookSeed, PatronSeed};
use crate::domain::{LendingPolicy, LibraryInfo, Staff};

const CONFIG_FILE: &str = "library.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Parsed library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library name and contact details
    pub library: LibraryInfo,

    /// Lending rules
    pub policy: LendingPolicy,

    /// Employees
    pub staff: Vec<Staff>,

    /// Books cataloged at startup
    pub books: Vec<BookSeed>,

    /// Patrons registered at startup
    pub patrons: Vec<PatronSeed>,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is None. A missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Returns the user config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "lendbook", "lendbook").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Reads and parses a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.loan_period_days == 0 {
            return Err(ConfigError::Invalid(
                "policy.loan_period_days must be at least 1".to_string(),
            ));
        }
        if self.library.name.trim().is_empty() {
            return Err(ConfigError::Invalid("library.name must not be empty".to_string()));
        }
        Ok(())
    }
}
