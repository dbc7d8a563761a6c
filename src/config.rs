//! INI configuration for the edition tools.
//!
//! A primary file (`faust.ini`) is read first, then any local override files
//! (`local.ini`); later files win on conflicting keys. Environment variables of
//! the form `FAUST_<SECTION>_<KEY>` are applied last.
//!
//! Values are stored verbatim (no quote stripping, no escapes) and
//! `%(key)s` references are expanded on lookup from the same section or
//! `DEFAULT`; `%%` stands for a literal percent sign.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Primary configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "faust.ini";

/// Local override file, looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "local.ini";

/// Section whose keys act as fallbacks for every other section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Relay used for reports when `mail.host` is not configured
pub const DEFAULT_MAIL_HOST: &str = "localhost";

/// Nesting limit for `%(key)s` references
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Keys consulted for environment overrides even when no file defines them
const KNOWN_KEYS: [(&str, &str); 4] = [
    ("xml", "dir"),
    ("mail", "enabled"),
    ("mail", "host"),
    ("validate", "schema"),
];

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Loaded configuration, read-only once constructed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Load the primary file, then every override file that exists, then the
    /// environment.
    pub fn load(primary: &Path, overrides: &[PathBuf]) -> ConfigResult<Self> {
        let mut config = Self::from_files(primary, overrides)?;
        config.apply_environment_overrides_with(&SystemEnvProvider);
        debug!("Loaded configuration:\n{}", config.dump());
        Ok(config)
    }

    /// Read configuration files without consulting the environment
    pub fn from_files(primary: &Path, overrides: &[PathBuf]) -> ConfigResult<Self> {
        if !primary.is_file() {
            return Err(ConfigError::FileNotFound {
                path: primary.to_path_buf(),
            });
        }

        let mut config = Self::default();
        config.merge_file(primary)?;

        for path in overrides {
            if path.is_file() {
                config.merge_file(path)?;
            } else {
                debug!("Skipping absent configuration override {}", path.display());
            }
        }

        Ok(config)
    }

    /// Parse configuration from INI text
    pub fn from_ini_str(content: &str) -> ConfigResult<Self> {
        let mut config = Self::default();
        config.merge_ini(&Ini::load_from_str_opt(content, parse_option())?);
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> ConfigResult<()> {
        let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|source| ConfigError::Ini {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read configuration file {}", path.display());
        self.merge_ini(&ini);
        Ok(())
    }

    /// Merge parsed INI content; its values take precedence over existing ones
    pub fn merge_ini(&mut self, ini: &Ini) {
        for (section, properties) in ini.iter() {
            let section = section.unwrap_or(DEFAULT_SECTION);
            for (key, value) in properties.iter() {
                self.set(section, key, value);
            }
        }
    }

    /// Set a single value. Keys are case-insensitive, sections are not.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_lowercase(), value.into());
    }

    /// Look up a value, falling back to the `DEFAULT` section, with
    /// `%(key)s` references expanded
    pub fn get(&self, section: &str, key: &str) -> ConfigResult<String> {
        let key = key.to_lowercase();
        let raw = self
            .raw(section, &key)
            .ok_or_else(|| ConfigError::MissingField {
                section: section.to_string(),
                key: key.clone(),
            })?;
        self.interpolate(section, &key, raw, 1)
    }

    /// Look up a value, returning `None` instead of an error when absent
    pub fn get_opt(&self, section: &str, key: &str) -> ConfigResult<Option<String>> {
        match self.get(section, key) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::MissingField { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stored value without interpolation; `key` must be lower-cased
    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        [section, DEFAULT_SECTION]
            .iter()
            .find_map(|s| self.sections.get(*s).and_then(|values| values.get(key)))
            .map(String::as_str)
    }

    fn interpolate(
        &self,
        section: &str,
        key: &str,
        value: &str,
        depth: usize,
    ) -> ConfigResult<String> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(invalid(format!(
                "references nested deeper than {} levels",
                MAX_INTERPOLATION_DEPTH
            )));
        }

        let mut expanded = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(pos) = rest.find('%') {
            expanded.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];
            if let Some(after) = rest.strip_prefix('%') {
                expanded.push('%');
                rest = after;
            } else if let Some(after) = rest.strip_prefix('(') {
                let (name, after) = after
                    .split_once(")s")
                    .ok_or_else(|| invalid("unterminated %(...)s reference".to_string()))?;
                let name = name.to_lowercase();
                let referenced = self
                    .raw(section, &name)
                    .ok_or_else(|| invalid(format!("reference to missing key '{}'", name)))?;
                expanded.push_str(&self.interpolate(section, &name, referenced, depth + 1)?);
                rest = after;
            } else {
                return Err(invalid("'%' must be followed by '%' or '('".to_string()));
            }
        }
        expanded.push_str(rest);
        Ok(expanded)
    }

    /// Look up a boolean. Accepts 1/yes/true/on and 0/no/false/off.
    pub fn get_bool(&self, section: &str, key: &str) -> ConfigResult<bool> {
        let value = self.get(section, key)?;
        match value.trim().to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                section: section.to_string(),
                key: key.to_lowercase(),
                value: value.clone(),
                reason: "not a boolean".to_string(),
            }),
        }
    }

    /// Root directory of the edition's XML sources (`xml.dir`)
    pub fn xml_dir(&self) -> ConfigResult<String> {
        self.get("xml", "dir")
    }

    /// Whether reports are mailed rather than printed (`mail.enabled`)
    pub fn mail_enabled(&self) -> ConfigResult<bool> {
        self.get_bool("mail", "enabled")
    }

    /// SMTP relay for reports (`mail.host`, default `localhost`)
    pub fn mail_host(&self) -> ConfigResult<String> {
        Ok(self
            .get_opt("mail", "host")?
            .unwrap_or_else(|| DEFAULT_MAIL_HOST.to_string()))
    }

    /// Schema referenced by re-serialized TEI documents (`validate.schema`)
    pub fn validation_schema(&self) -> ConfigResult<String> {
        self.get("validate", "schema")
    }

    /// Apply `FAUST_<SECTION>_<KEY>` overrides with a custom environment provider
    pub fn apply_environment_overrides_with(&mut self, env: &impl EnvProvider) {
        let mut candidates: Vec<(String, String)> = KNOWN_KEYS
            .iter()
            .map(|(s, k)| (s.to_string(), k.to_string()))
            .collect();
        for (section, values) in &self.sections {
            for key in values.keys() {
                candidates.push((section.clone(), key.clone()));
            }
        }
        candidates.sort();
        candidates.dedup();

        for (section, key) in candidates {
            let name = env_var_name(&section, &key);
            if let Some(value) = env.get(&name) {
                debug!("Overriding {}.{} from {}", section, key, name);
                self.set(&section, &key, value);
            }
        }
    }

    /// Iterate over all `(section, key, value)` entries in sorted order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections.iter().flat_map(|(section, values)| {
            values
                .iter()
                .map(move |(key, value)| (section.as_str(), key.as_str(), value.as_str()))
        })
    }

    /// Render the configuration as aligned `section.key => value` lines.
    /// References are expanded where they resolve.
    pub fn dump(&self) -> String {
        let lines: Vec<(String, String)> = self
            .entries()
            .map(|(section, key, raw)| {
                let value = self
                    .interpolate(section, key, raw, 1)
                    .unwrap_or_else(|_| raw.to_string());
                let value = value
                    .split(['\r', '\n'])
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                (format!("{}.{}", section, key), value)
            })
            .collect();

        let width = lines.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        lines
            .iter()
            .map(|(name, value)| format!("{:<width$} => {}", name, value, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Values are kept exactly as written
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// Environment variable consulted for a configuration key
pub fn env_var_name(section: &str, key: &str) -> String {
    format!("FAUST_{}_{}", section, key)
        .to_uppercase()
        .replace(['.', '-'], "_")
}
