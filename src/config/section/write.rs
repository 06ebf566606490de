//! `[write]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [write]
//! base = "http://example.com/lists/"   # Relativize against this, not the output file
//! xml-base = false                     # Emit the base as a root xml:base
//! indent = 2                           # Spaces per level, 0 for a single line
//! ```

use serde::{Deserialize, Serialize};

use crate::uri::Uri;
use crate::xspf::WriteOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WriteConfig {
    pub base: Option<Uri>,
    pub xml_base: bool,
    pub indent: usize,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            base: None,
            xml_base: false,
            indent: 2,
        }
    }
}

impl WriteConfig {
    /// Writer options with `fallback_base` (usually the output location)
    /// used when no base is configured.
    pub fn options(&self, fallback_base: Option<Uri>) -> WriteOptions {
        WriteOptions {
            base: self.base.clone().or(fallback_base),
            emit_xml_base: self.xml_base,
            indent: self.indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_write_config() {
        let config = test_parse_config("[write]\nxml-base = true\nindent = 0");
        assert!(config.write.xml_base);
        assert_eq!(config.write.indent, 0);
        assert!(config.write.base.is_none());
    }

    #[test]
    fn test_configured_base_wins_over_fallback() {
        let fallback = Uri::parse("file:///tmp/out.xspf").unwrap();

        let config = test_parse_config("");
        assert_eq!(config.write.options(Some(fallback.clone())).base, Some(fallback.clone()));

        let config = test_parse_config("[write]\nbase = \"http://example.com/\"");
        assert_eq!(
            config.write.options(Some(fallback)).base,
            Some(Uri::parse("http://example.com/").unwrap())
        );
    }
}
