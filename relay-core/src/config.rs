use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{archive::DEFAULT_ARCHIVE_URL, geocoding::DEFAULT_GEOCODING_URL};

pub const TOKEN_ENV: &str = "WEATHER_RELAY_TOKEN";
pub const BIND_ENV: &str = "WEATHER_RELAY_BIND";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_token = "..."
/// bind = "0.0.0.0:5000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Token every client must send in the request body.
    pub api_token: Option<String>,

    /// Address the HTTP server listens on.
    pub bind: String,

    pub geocoding_url: String,
    pub archive_url: String,

    /// Timeout for each upstream request.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            bind: "127.0.0.1:5000".to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Return the configured access token.
    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API token configured.\n\
                     Hint: run `weather-relay configure` or set {TOKEN_ENV}."
                )
            })
    }

    pub fn set_api_token(&mut self, token: String) {
        self.api_token = Some(token);
    }

    /// Load config from the platform config directory, or defaults on first run.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Apply `WEATHER_RELAY_*` environment variables on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|b| !b.is_empty()) {
            self.bind = bind;
        }
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-relay", "weather-relay")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn api_token_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_token().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API token configured"));
        assert!(msg.contains("Hint: run `weather-relay configure`"));
    }

    #[test]
    fn empty_api_token_counts_as_unset() {
        let mut cfg = Config::default();
        cfg.set_api_token(String::new());
        assert!(cfg.api_token().is_err());
    }

    #[test]
    fn set_api_token_is_returned() {
        let mut cfg = Config::default();
        cfg.set_api_token("iamsecure".into());
        assert_eq!(cfg.api_token().unwrap(), "iamsecure");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_token("iamsecure".into());
        cfg.bind = "0.0.0.0:8080".into();
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_token = \"abc\"\ntimeout_secs = 5\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_token().unwrap(), "abc");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.bind, Config::default().bind);
        assert_eq!(cfg.archive_url, DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([(TOKEN_ENV, "from-env"), (BIND_ENV, "0.0.0.0:9000")]);

        let mut cfg = Config::default();
        cfg.set_api_token("from-file".into());
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.api_token().unwrap(), "from-env");
        assert_eq!(cfg.bind, "0.0.0.0:9000");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_token("from-file".into());
        cfg.apply_overrides(|_| Some(String::new()));

        assert_eq!(cfg.api_token().unwrap(), "from-file");
        assert_eq!(cfg.bind, Config::default().bind);
    }
}
