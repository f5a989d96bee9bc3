// Validator settings: path separator and the legacy schema markers

use crate::loader::{self, FileFormat};
use crate::{ConfigurationError, Result};
use schemata_log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Prefix of the environment variables read by [`ValidatorSettings::from_env`]
pub const DEFAULT_ENV_PREFIX: &str = "SCHEMATA";

/// Markers of the suffix-encoded schema format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSyntax {
    /// Rule-set key marking a scalar field optional
    pub optional_key: String,
    /// Key marking an object or array field optional
    pub nested_optional_key: String,
    /// Key naming the element property that keys array errors
    pub index_by_key: String,
    pub array_suffix: String,
    pub values_suffix: String,
    pub object_suffix: String,
    /// Rules whose string parameters are compiled to patterns when decoding
    pub pattern_rules: Vec<String>,
}

impl Default for SchemaSyntax {
    fn default() -> Self {
        Self {
            optional_key: "optional".to_string(),
            nested_optional_key: "__optional".to_string(),
            index_by_key: "__indexBy__".to_string(),
            array_suffix: "[]".to_string(),
            values_suffix: "[v]".to_string(),
            object_suffix: "{}".to_string(),
            pattern_rules: vec!["match".to_string()],
        }
    }
}

impl SchemaSyntax {
    /// Keys that never name a field or a rule
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.index_by_key || key == self.nested_optional_key
    }

    pub fn is_pattern_rule(&self, rule: &str) -> bool {
        self.pattern_rules.iter().any(|r| r == rule)
    }
}

/// Settings of a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    /// Separator of field paths given to `validate_field`
    pub path_separator: char,
    pub syntax: SchemaSyntax,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            path_separator: '.',
            syntax: SchemaSyntax::default(),
        }
    }
}

impl ValidatorSettings {
    /// Load settings from a JSON or TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let value = loader::load_file(path)?;
        serde_json::from_value(value)
            .map_err(|e| ConfigurationError::Parse(format!("Invalid settings: {}", e)))
    }

    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        let value = format.parse(content)?;
        serde_json::from_value(value)
            .map_err(|e| ConfigurationError::Parse(format!("Invalid settings: {}", e)))
    }

    /// Defaults overridden by `SCHEMATA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(DEFAULT_ENV_PREFIX)
    }

    /// Override fields from `<prefix>_*` environment variables
    pub fn apply_env(self, prefix: &str) -> Result<Self> {
        self.apply_vars(env::vars(), prefix)
    }

    /// Override fields from `<prefix>_*` pairs. Recognised names are
    /// `PATH_SEPARATOR`, `OPTIONAL_KEY`, `NESTED_OPTIONAL_KEY`,
    /// `INDEX_BY_KEY` and `PATTERN_RULES` (comma separated).
    pub fn apply_vars<I>(mut self, vars: I, prefix: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", prefix.trim_end_matches('_'));
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(&prefix) else {
                continue;
            };
            match name {
                "PATH_SEPARATOR" => {
                    let mut chars = value.chars();
                    self.path_separator = match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => {
                            return Err(ConfigurationError::Parse(format!(
                                "{} must be a single character, got {:?}",
                                key, value
                            )));
                        }
                    };
                }
                "OPTIONAL_KEY" => self.syntax.optional_key = value,
                "NESTED_OPTIONAL_KEY" => self.syntax.nested_optional_key = value,
                "INDEX_BY_KEY" => self.syntax.index_by_key = value,
                "PATTERN_RULES" => {
                    self.syntax.pattern_rules = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                _ => continue,
            }
            debug!("Settings override from {}", key);
        }
        Ok(self)
    }
}
