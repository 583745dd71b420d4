//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FORUM_HARVEST_*)
//! 2. TOML config file (if FORUM_HARVEST_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// Keyword/month table used for date normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLocaleName {
    /// "today at 1:10", "28 dec 2025 at 1:10"
    #[default]
    En,
    /// "сегодня в 1:10", "28 дек 2025 в 1:10"
    Ru,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FORUM_HARVEST_*)
/// 2. TOML config file (if FORUM_HARVEST_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Topic page to harvest.
    ///
    /// Set via FORUM_HARVEST_TOPIC_URL environment variable.
    /// Required only by the collect command.
    #[serde(default)]
    pub topic_url: Option<String>,

    /// Output records file (JSON array).
    ///
    /// Set via FORUM_HARVEST_RECORDS_PATH environment variable.
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,

    /// Saved session (cookies) file.
    ///
    /// Set via FORUM_HARVEST_STATE_PATH environment variable.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Offset increment between pages.
    #[serde(default = "default_page_step")]
    pub page_step: u32,

    /// Last offset to visit (inclusive).
    #[serde(default = "default_max_offset")]
    pub max_offset: u32,

    /// Run the browser without a window.
    ///
    /// Defaults to false so a manual login stays possible.
    #[serde(default)]
    pub headless: bool,

    /// Pause for manual login when posts are not visible on the first load.
    #[serde(default = "default_login_wait_ms")]
    pub login_wait_ms: u64,

    /// Wait for posts on the very first load, before assuming a login is needed.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Wait for posts on every other page load.
    #[serde(default = "default_content_timeout_ms")]
    pub content_timeout_ms: u64,

    /// Delay before re-reading a page that yielded no posts.
    #[serde(default = "default_empty_retry_ms")]
    pub empty_retry_ms: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Keyword and month table for relative dates.
    ///
    /// Set via FORUM_HARVEST_DATE_LOCALE ("en" or "ru").
    #[serde(default)]
    pub date_locale: DateLocaleName,
}

fn default_records_path() -> PathBuf {
    PathBuf::from("out/topic.json")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("out/session_state.json")
}

fn default_page_step() -> u32 {
    20
}

fn default_max_offset() -> u32 {
    1800
}

fn default_login_wait_ms() -> u64 {
    60_000
}

fn default_probe_timeout_ms() -> u64 {
    10_000
}

fn default_content_timeout_ms() -> u64 {
    30_000
}

fn default_empty_retry_ms() -> u64 {
    1_500
}

fn default_viewport_width() -> u32 {
    1400
}

fn default_viewport_height() -> u32 {
    900
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            topic_url: None,
            records_path: default_records_path(),
            state_path: default_state_path(),
            page_step: default_page_step(),
            max_offset: default_max_offset(),
            headless: false,
            login_wait_ms: default_login_wait_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            content_timeout_ms: default_content_timeout_ms(),
            empty_retry_ms: default_empty_retry_ms(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            date_locale: DateLocaleName::default(),
        }
    }
}

impl AppConfig {
    pub fn login_wait(&self) -> Duration {
        Duration::from_millis(self.login_wait_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }

    pub fn empty_retry(&self) -> Duration {
        Duration::from_millis(self.empty_retry_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FORUM_HARVEST_`
    /// 2. TOML file from `FORUM_HARVEST_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FORUM_HARVEST_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FORUM_HARVEST_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parse the topic URL (deferred until a command needs it).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the URL is not set and
    /// `ConfigError::Invalid` if it is not an http(s) URL.
    pub fn require_topic_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .topic_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "topic_url".into(),
                hint: "Set FORUM_HARVEST_TOPIC_URL environment variable or pass --topic-url".into(),
            })?;

        let url = Url::parse(raw)
            .map_err(|e| ConfigError::Invalid { field: "topic_url".into(), reason: e.to_string() })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid {
                field: "topic_url".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.topic_url.is_none());
        assert_eq!(config.records_path, PathBuf::from("out/topic.json"));
        assert_eq!(config.state_path, PathBuf::from("out/session_state.json"));
        assert_eq!(config.page_step, 20);
        assert_eq!(config.max_offset, 1800);
        assert!(!config.headless);
        assert_eq!(config.login_wait(), Duration::from_secs(60));
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.content_timeout(), Duration::from_secs(30));
        assert_eq!(config.empty_retry(), Duration::from_millis(1500));
        assert_eq!((config.viewport_width, config.viewport_height), (1400, 900));
        assert_eq!(config.date_locale, DateLocaleName::En);
    }

    #[test]
    fn test_require_topic_url_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_topic_url(), Err(ConfigError::Missing { .. })));

        let config = AppConfig { topic_url: Some("   ".into()), ..Default::default() };
        assert!(matches!(config.require_topic_url(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_topic_url_present() {
        let config = AppConfig { topic_url: Some("https://vk.com/topic-1_2".into()), ..Default::default() };
        let url = config.require_topic_url().unwrap();
        assert_eq!(url.as_str(), "https://vk.com/topic-1_2");
    }

    #[test]
    fn test_require_topic_url_rejects_scheme() {
        let config = AppConfig { topic_url: Some("file:///etc/passwd".into()), ..Default::default() };
        assert!(matches!(config.require_topic_url(), Err(ConfigError::Invalid { .. })));

        let config = AppConfig { topic_url: Some("not a url".into()), ..Default::default() };
        assert!(matches!(config.require_topic_url(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_load_layers_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "harvest.toml",
                r#"
                    topic_url = "https://vk.com/topic-1_2"
                    max_offset = 100
                    date_locale = "ru"
                "#,
            )?;
            jail.set_env("FORUM_HARVEST_CONFIG_FILE", "harvest.toml");
            jail.set_env("FORUM_HARVEST_MAX_OFFSET", "40");
            jail.set_env("FORUM_HARVEST_HEADLESS", "true");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.topic_url.as_deref(), Some("https://vk.com/topic-1_2"));
            assert_eq!(config.max_offset, 40);
            assert!(config.headless);
            assert_eq!(config.date_locale, DateLocaleName::Ru);
            assert_eq!(config.page_step, 20);
            Ok(())
        });
    }
}
