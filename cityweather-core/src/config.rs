use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

/// Settings for the weatherapi.com provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,

    /// Overrides the default `https://api.weatherapi.com/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [weatherapi]
    /// api_key = "..."
    #[serde(default)]
    pub weatherapi: ProviderConfig,

    #[serde(skip)]
    pub(crate) env_api_key: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// `WEATHERAPI_KEY` is picked up from the environment.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.env_api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weatherapi.api_key = Some(api_key);
    }

    /// The stored API key, ignoring the environment.
    pub fn stored_api_key(&self) -> Option<&str> {
        self.weatherapi.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// The key to use for requests: environment first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.env_api_key
            .clone()
            .or_else(|| self.stored_api_key().map(str::to_owned))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.weatherapi.base_url.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.resolve_api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_not_configured() {
        let cfg = Config::default();
        assert!(!cfg.is_configured());
        assert_eq!(cfg.resolve_api_key(), None);
    }

    #[test]
    fn stored_key_is_used() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.stored_api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.resolve_api_key().as_deref(), Some("FILE_KEY"));
        assert!(cfg.is_configured());
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());
        cfg.env_api_key = Some("ENV_KEY".into());

        assert_eq!(cfg.resolve_api_key().as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.stored_api_key(), Some("FILE_KEY"));
    }

    #[test]
    fn blank_stored_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(!cfg.is_configured());
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("default config");
        assert!(cfg.stored_api_key().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED_KEY".into());
        cfg.weatherapi.base_url = Some("http://127.0.0.1:9000/v1".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.stored_api_key(), Some("SAVED_KEY"));
        assert_eq!(loaded.base_url(), Some("http://127.0.0.1:9000/v1"));
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "weatherapi = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
