//! Store configuration and backing-path resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::Locale;

/// Default locale for single-locale stores.
pub const DEFAULT_LOCALE: &str = "en";
/// Default base directory for single-locale stores.
pub const DEFAULT_DIRECTORY: &str = "locales";
/// Default namespace.
pub const DEFAULT_NAMESPACE: &str = "app";

const FILE_EXTENSION: &str = "json";

/// Configuration rejected before a store is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supplied configuration value was not a JSON object.
    #[error("config must be an object")]
    NotAnObject,
    /// A required option was absent or empty.
    #[error("config option `{0}` is required")]
    MissingField(&'static str),
    /// A recognized option had the wrong type.
    #[error("invalid config: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Single-locale store configuration.
///
/// Resolves to `directory/namespace/<locale>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Locale stored by this file.
    pub locale: Locale,
    /// Base directory for all namespaces.
    pub directory: PathBuf,
    /// Logical grouping of messages.
    pub namespace: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl DictionaryConfig {
    /// Builds a config from loosely typed JSON.
    ///
    /// `null` means "all defaults". Unrecognized keys are ignored and empty
    /// strings fall back to the default for that option.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => {
                let cfg: Self = serde_json::from_value(value.clone())?;
                Ok(cfg.with_defaults())
            }
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Overrides the locale.
    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Overrides the base directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Overrides the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Backing file for this locale.
    pub fn file_path(&self) -> PathBuf {
        self.directory
            .join(&self.namespace)
            .join(format!("{}.{FILE_EXTENSION}", self.locale))
    }

    fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.locale.is_empty() {
            self.locale = defaults.locale;
        }
        if self.directory.as_os_str().is_empty() {
            self.directory = defaults.directory;
        }
        if self.namespace.is_empty() {
            self.namespace = defaults.namespace;
        }
        self
    }
}

/// Multi-locale store configuration.
///
/// Resolves to `directory/<namespace>.json`; `directory` has no default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedConfig {
    /// Base directory holding one file per namespace.
    pub directory: PathBuf,
    /// Logical grouping of messages; also the file stem.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl LocalizedConfig {
    /// Config for `directory` with the default namespace.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            namespace: default_namespace(),
        }
    }

    /// Overrides the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Builds a config from loosely typed JSON; `directory` must be present.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject);
        };
        let has_directory = map
            .get("directory")
            .and_then(Value::as_str)
            .is_some_and(|d| !d.is_empty());
        if !has_directory {
            return Err(ConfigError::MissingField("directory"));
        }

        let mut cfg: Self = serde_json::from_value(value.clone())?;
        if cfg.namespace.is_empty() {
            cfg.namespace = default_namespace();
        }
        Ok(cfg)
    }

    /// Backing file for the whole namespace.
    pub fn file_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{FILE_EXTENSION}", self.namespace))
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_and_empty_object_use_defaults() {
        let a = DictionaryConfig::from_value(&Value::Null).expect("null");
        let b = DictionaryConfig::from_value(&json!({})).expect("empty");
        assert_eq!(a, DictionaryConfig::default());
        assert_eq!(b, DictionaryConfig::default());
        assert_eq!(a.locale, "en");
        assert_eq!(a.directory, PathBuf::from("locales"));
        assert_eq!(a.namespace, "app");
    }

    #[test]
    fn non_object_config_is_rejected() {
        assert!(matches!(
            DictionaryConfig::from_value(&json!([])),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            LocalizedConfig::from_value(&json!("dir")),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn unknown_keys_are_ignored_and_known_keys_honored() {
        let cfg = DictionaryConfig::from_value(&json!({
            "locale": "id",
            "directory": "locales/api",
            "namespace": "error",
            "name": "inherited"
        }))
        .expect("config");
        assert_eq!(cfg.locale, "id");
        assert_eq!(cfg.directory, PathBuf::from("locales/api"));
        assert_eq!(cfg.namespace, "error");
    }

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let cfg = DictionaryConfig::from_value(&json!({"locale": "", "namespace": ""})).expect("config");
        assert_eq!(cfg, DictionaryConfig::default());
    }

    #[test]
    fn single_locale_path_is_namespace_then_locale() {
        let path = DictionaryConfig::default().file_path();
        assert!(path.ends_with("locales/app/en.json"));
    }

    #[test]
    fn localized_config_requires_directory() {
        assert!(matches!(
            LocalizedConfig::from_value(&json!({"namespace": "global"})),
            Err(ConfigError::MissingField("directory"))
        ));
        let cfg = LocalizedConfig::from_value(&json!({"directory": "locales"})).expect("config");
        assert_eq!(cfg.namespace, "app");
        assert!(cfg.file_path().ends_with("locales/app.json"));
    }
}
