//! Configuration for `xspf.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [read] and [write]
//! ├── error          # ConfigError
//! ├── util           # config file discovery
//! └── mod.rs         # XspfConfig (this file)
//! ```
//!
//! Every section is optional; a missing file means defaults.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ReadConfig, WriteConfig};
pub use util::find_config_file;

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::log;

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE_NAME: &str = "xspf.toml";

// ============================================================================
// root configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XspfConfig {
    /// Where this config was loaded from, if anywhere.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub read: ReadConfig,

    #[serde(default)]
    pub write: WriteConfig,
}

impl XspfConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `xspf.toml` is searched
    /// upward from the working directory and defaults are used when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match find_config_file(Path::new(CONFIG_FILE_NAME)) {
                Some(path) => path,
                None => {
                    crate::debug!("config"; "no {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
            },
        };
        Self::from_path(&path)
    }

    /// Load and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        config.config_path = Some(path.to_path_buf());
        crate::debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Check values serde cannot: bases must be absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, base) in [("read.base", &self.read.base), ("write.base", &self.write.base)] {
            if let Some(base) = base
                && !base.is_absolute()
            {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: format!("`{base}` is not an absolute URI"),
                });
            }
        }
        Ok(())
    }
}

/// Parse config content in tests, panicking on errors.
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> XspfConfig {
    let (config, _) = XspfConfig::parse_with_ignored(content).unwrap();
    config
}
