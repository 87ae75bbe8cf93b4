//! Optional settings file
//!
//! Read once at startup from `~/.config/gpio-mouse/config.toml` (or the path in
//! `GPIO_MOUSE_CONFIG`). A missing file falls back to the built-in defaults so
//! the poller always starts; a malformed one is a startup error.

use crate::controller::PollerSettings;
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::Level;

const CONFIG_ENV: &str = "GPIO_MOUSE_CONFIG";
const CONFIG_DIR: &str = "gpio-mouse";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Max tracing level: trace, debug, info, warn or error
    pub log_level: String,
    pub poller: PollerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            poller: PollerSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| eyre!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.poller
            .validate()
            .map_err(|e| eyre!("Invalid [poller] section: {}", e))?;
        self.max_level()?;
        Ok(())
    }

    pub fn max_level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| eyre!("Unknown log level: {}", self.log_level))
    }

    /// Loads the config at `path`, or defaults when there is no such file
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path)
            .await
            .map_err(|e| eyre!("Failed to check config file {}: {}", path.display(), e))?
        {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(&config_path()).await
    }
}

pub fn config_path() -> PathBuf {
    resolve_config_path(std::env::var_os(CONFIG_ENV))
}

fn resolve_config_path(override_path: Option<OsString>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poller.poll_interval_ms, 20);
        assert_eq!(config.poller.step, 5);
        assert_eq!(config.max_level().unwrap(), Level::INFO);
    }

    #[test]
    fn partial_poller_section_keeps_other_defaults() {
        let config = AppConfig::from_toml("log_level = \"debug\"\n[poller]\nstep = 8\n").unwrap();
        assert_eq!(config.poller.step, 8);
        assert_eq!(config.poller.poll_interval_ms, 20);
        assert_eq!(config.max_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(AppConfig::from_toml("[poller]\npoll_interval_ms = 0\n").is_err());
    }

    #[test]
    fn negative_step_is_rejected() {
        assert!(AppConfig::from_toml("[poller]\nstep = -5\n").is_err());
    }

    #[test]
    fn oversized_step_is_rejected() {
        assert!(AppConfig::from_toml("[poller]\nstep = 2147483647\n").is_err());
    }

    #[test]
    fn default_path_lives_in_config_dir() {
        let path = resolve_config_path(None);
        assert!(path.ends_with("gpio-mouse/config.toml"));
        assert_eq!(resolve_config_path(Some(OsString::new())), path);
    }

    #[test]
    fn override_path_wins() {
        let path = resolve_config_path(Some(OsString::from("/etc/gpio-mouse.toml")));
        assert_eq!(path, PathBuf::from("/etc/gpio-mouse.toml"));
    }

    // Only test touching GPIO_MOUSE_CONFIG
    #[test]
    fn config_path_reads_env_override() {
        let previous = std::env::var_os(CONFIG_ENV);
        let custom = std::env::temp_dir().join("gpio-mouse-env.toml");
        std::env::set_var(CONFIG_ENV, &custom);
        let with_override = config_path();
        std::env::remove_var(CONFIG_ENV);
        let without_override = config_path();
        if let Some(previous) = previous {
            std::env::set_var(CONFIG_ENV, previous);
        }

        assert_eq!(with_override, custom);
        assert!(without_override.ends_with("gpio-mouse/config.toml"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(AppConfig::from_toml("log_level = \"loud\"\n").is_err());
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(AppConfig::from_toml("[poller\nstep = ").is_err());
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("gpio-mouse-does-not-exist.toml");
        let config = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn loads_settings_from_file() {
        let path = std::env::temp_dir().join(format!("gpio-mouse-{}.toml", std::process::id()));
        tokio::fs::write(&path, "[poller]\npoll_interval_ms = 35\n")
            .await
            .unwrap();

        let config = AppConfig::load_from(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(config.poller.poll_interval_ms, 35);
        assert_eq!(config.poller.step, 5);
    }
}
