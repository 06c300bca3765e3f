use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Errors that can occur while reading or writing the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No per-user configuration directory could be determined.
    NoConfigDir,
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Serialize(toml::ser::Error),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Unable to determine the configuration directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
            ConfigError::Serialize(source) => write!(f, "Failed to serialize config: {source}"),
            ConfigError::Write { path, source } => {
                write!(f, "Failed to write config at {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
            ConfigError::Write { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API key sent as a bearer token
    pub api_key: Option<String>,
    /// Model requested for completions
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: Option<String>,
}

/// Effective settings after applying environment fallbacks and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("com", "incsub", "gptcli").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// A missing file is not an error; it yields the default configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(config_path)
            .map_err(|err| write_err(err.error))?;
        Ok(())
    }

    /// Write a starter configuration unless one already exists.
    /// Returns whether a new file was created.
    pub fn init_at(config_path: &Path) -> Result<bool, ConfigError> {
        if config_path.exists() {
            return Ok(false);
        }
        let starter = Config {
            api_key: Some(String::new()),
            model: Some(DEFAULT_MODEL.to_string()),
            base_url: None,
        };
        starter.save_to_path(config_path)?;
        Ok(true)
    }

    pub fn resolve(&self) -> ResolvedConfig {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary environment lookup. File values win over
    /// the environment; empty strings count as unset.
    pub fn resolve_with<F>(&self, env: F) -> ResolvedConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        ResolvedConfig {
            api_key: non_empty(self.api_key.clone()).or_else(|| non_empty(env(API_KEY_ENV))),
            model: non_empty(self.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty(self.base_url.clone())
                .or_else(|| non_empty(env(BASE_URL_ENV)))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4".to_string()),
            base_url: None,
        };
        config.save_to_path(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_reports_parse_error_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn init_creates_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::init_at(&path).unwrap());
        fs::write(&path, "api_key = \"kept\"\n").unwrap();
        assert!(!Config::init_at(&path).unwrap());

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("kept"));
    }

    #[test]
    fn starter_config_has_no_usable_credential() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::init_at(&path).unwrap();
        let resolved = Config::load_from_path(&path).unwrap().resolve_with(no_env);
        assert_eq!(resolved.api_key, None);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn environment_fills_unset_values_only() {
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("from-env".to_string()),
            "OPENAI_BASE_URL" => Some("http://localhost:1234/v1".to_string()),
            _ => None,
        };

        let resolved = Config::default().resolve_with(env);
        assert_eq!(resolved.api_key.as_deref(), Some("from-env"));
        assert_eq!(resolved.base_url, "http://localhost:1234/v1");

        let config = Config {
            api_key: Some("from-file".to_string()),
            model: None,
            base_url: Some("https://example.com/v1".to_string()),
        };
        let resolved = config.resolve_with(env);
        assert_eq!(resolved.api_key.as_deref(), Some("from-file"));
        assert_eq!(resolved.base_url, "https://example.com/v1");
    }
}
