//! Layered configuration loading.
//!
//! Layers apply in order, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. A TOML or JSON file, or a string
//! 3. `PARAMBIND__SECTION__KEY` environment variables

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{BindConfig, ConfigError};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "PARAMBIND";

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```no_run
/// use parambind_config::ConfigLoader;
///
/// # fn main() -> Result<(), parambind_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("parambind.toml")?
///     .with_env()
///     .load()?;
/// let binder = parambind::Binder::with_options(config.binder_options());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: BindConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: BindConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = BindConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = BindConfig::production();
        self
    }

    /// Load configuration from a `.toml` or `.json` file.
    ///
    /// Sections the file omits take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// has an unknown extension or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        self.config = Self::parse(&content, &format)
            .map_err(|e| match e {
                ConfigError::UnsupportedFormat(_) => {
                    ConfigError::UnsupportedFormat(path.display().to_string())
                }
                other => other,
            })?;

        Ok(self)
    }

    /// Load a file if it exists; otherwise continue unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `format` ("toml" or "json").
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use parambind_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [format]
    ///     extra_time_formats = ["%m/%d/%Y"]
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.format.extra_time_formats, ["%m/%d/%Y"]);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = Self::parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Apply `PARAMBIND__…` environment overrides at load time.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Apply `PREFIX__SECTION__KEY` environment overrides at load time.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    ///
    /// Returns the path that was loaded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => Ok((self, Some(path))),
            Err(e) if e.not_found() => Ok((self, None)),
            Err(e) => Err(ConfigError::env_parse_error(".env", e.to_string())),
        }
    }

    /// Apply overrides from explicit `(name, value)` pairs using `prefix`.
    ///
    /// Names without the prefix are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvParseError` for a value of the wrong type.
    pub fn with_vars<I, K, V>(mut self, prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let prefix = prefix.to_uppercase();
        for (key, value) in vars {
            self.apply_env_var(key.as_ref(), value.as_ref(), &prefix)?;
        }
        Ok(self)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<BindConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self = self.with_vars(&prefix, env::vars())?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> BindConfig {
        self.config
    }

    fn parse(content: &str, format: &str) -> Result<BindConfig, ConfigError> {
        match format {
            "toml" => Ok(toml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["FORMAT", "DATE"] => config.format.date = value.to_string(),
            ["FORMAT", "DATETIME"] => config.format.datetime = value.to_string(),
            ["FORMAT", "EXTRA_TIME_FORMATS"] => {
                config.format.extra_time_formats = value
                    .split(';')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }

            ["LIMITS", "MAX_SLICE_INDEX"] => {
                config.limits.max_slice_index = parse_usize(key, value)?;
            }
            ["LIMITS", "MAX_DEPTH"] => config.limits.max_depth = parse_usize(key, value)?,
            ["LIMITS", "MAX_BODY_SIZE"] => config.limits.max_body_size = parse_usize(key, value)?,
            ["LIMITS", "MAX_FIELDS"] => config.limits.max_fields = parse_usize(key, value)?,

            ["UPLOADS", "TEMP_DIR"] => {
                config.uploads.temp_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            ["UPLOADS", "TEMP_PREFIX"] => config.uploads.temp_prefix = value.to_string(),

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "BINDER_LEVEL"] => {
                config.logging.binder_level = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            ["LOGGING", "FORMAT"] => {
                config.logging.json_format = match value.to_lowercase().as_str() {
                    "json" => true,
                    "pretty" => false,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }

            _ => {}
        }

        Ok(())
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected non-negative integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, BindConfig::default());
    }

    #[test]
    fn test_loader_presets() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert!(!config.logging.json_format);

        let config = ConfigLoader::new().with_production().load().unwrap();
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"limits": {"max_slice_index": 20}, "uploads": {"temp_prefix": "up"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "JSON")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.limits.max_slice_index, 20);
        assert_eq!(config.limits.max_fields, 1000);
        assert_eq!(config.uploads.temp_prefix, "up");
    }

    #[test]
    fn test_loader_with_string_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(f)) if f == "yaml"));
    }

    #[test]
    fn test_loader_rejects_unknown_section() {
        let result = ConfigLoader::new().with_string("[server]\nport = 1", "toml");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [format]
            datetime = "%Y-%m-%dT%H:%M:%S"

            [logging]
            level = "warn"
            binder_level = "debug"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.format.datetime, "%Y-%m-%dT%H:%M:%S");
        assert_eq!(config.format.date, "%Y-%m-%d");
        assert_eq!(config.logging.directives(), "warn,parambind::binder=debug");
    }

    #[test]
    fn test_loader_with_file_bad_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/parambind.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/parambind.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, BindConfig::default());
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[format]\ndate = \"\"", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigLoader::new()
            .with_vars(
                "PARAMBIND",
                [
                    ("PARAMBIND__FORMAT__EXTRA_TIME_FORMATS", "%m/%d/%Y;%d.%m.%Y"),
                    ("PARAMBIND__LIMITS__MAX_FIELDS", "50"),
                    ("PARAMBIND__UPLOADS__TEMP_DIR", "/var/tmp/uploads"),
                    ("PARAMBIND__LOGGING__FORMAT", "pretty"),
                    ("PARAMBIND__LOGGING__ENABLED", "off"),
                    ("OTHER__LIMITS__MAX_FIELDS", "1"),
                ],
            )
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.format.extra_time_formats, ["%m/%d/%Y", "%d.%m.%Y"]);
        assert_eq!(config.limits.max_fields, 50);
        assert_eq!(
            config.uploads.temp_dir.as_deref(),
            Some(Path::new("/var/tmp/uploads"))
        );
        assert!(!config.logging.json_format);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = ConfigLoader::new()
            .with_string("[limits]\nmax_slice_index = 5", "toml")
            .unwrap()
            .with_vars(
                "parambind",
                [
                    ("PARAMBIND__LIMITS__MAX_SLICE_INDEX", "7"),
                    ("PARAMBIND__LIMITS__MAX_DEPTH", "16"),
                ],
            )
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.limits.max_slice_index, 7);
        assert_eq!(config.limits.max_depth, 16);
    }

    #[test]
    fn test_env_invalid_values() {
        let result =
            ConfigLoader::new().with_vars("PARAMBIND", [("PARAMBIND__LIMITS__MAX_FIELDS", "-1")]);
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));

        let result =
            ConfigLoader::new().with_vars("PARAMBIND", [("PARAMBIND__LOGGING__FORMAT", "xml")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
