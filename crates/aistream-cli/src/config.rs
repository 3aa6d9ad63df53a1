//! CLI configuration
//!
//! Optional TOML file; command-line flags win over it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fail on invalid UTF-8
    pub strict_utf8: bool,
    /// Print chunk boundaries
    pub show_chunks: bool,
    /// Print a JSON summary at the end
    pub summary: bool,
    /// Default log filter when RUST_LOG is unset
    pub log_level: Option<String>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aistream").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// An explicit path must exist; a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Flags can only switch options on
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        self.strict_utf8 |= cli.strict;
        self.show_chunks |= cli.show_chunks;
        self.summary |= cli.summary;
        if cli.verbose {
            self.log_level = Some("debug".to_string());
        }
        self
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
