//! Conversion between paths relative to the XML root and absolute paths.

use crate::config::Config;
use crate::error::ConfigResult;

/// Separator used when joining paths onto the XML root
pub const SEPARATOR: char = '/';

/// The configured root directory of the edition's XML sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlRoot {
    dir: String,
}

impl XmlRoot {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root taken from `xml.dir`
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self::new(config.xml_dir()?))
    }

    pub fn as_str(&self) -> &str {
        &self.dir
    }

    /// Path of `path` relative to the root; paths outside the root are
    /// returned unchanged.
    pub fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.dir.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .unwrap_or(path)
    }

    /// Absolute path of `path` given relative to the root. No normalization.
    pub fn absolute_path(&self, path: &str) -> String {
        format!("{}{}{}", self.dir, SEPARATOR, path)
    }
}
