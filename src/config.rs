use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wrap each heading and the block after it in an unbreakable block.
    pub keep_heading_with_next: bool,
    /// Lists with at most this many items are kept on one page.
    pub list_keep_together: usize,
    pub code_keep_together: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keep_heading_with_next: true,
            list_keep_together: 5,
            code_keep_together: true,
        }
    }
}

impl Config {
    /// The bundled defaults from `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects a malformed file, so this only falls back on schema drift.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            warn!("bundled config did not deserialize: {e}");
            Self::default()
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise use the compiled defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::compiled_default())
        }
    }
}
