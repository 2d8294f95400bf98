//! Site configuration.
//!
//! Pages may embed a JSON block (`<script type="application/json"
//! id="site-config">`) to override the defaults below. Every field is
//! optional in the document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTOPLAY, DEFAULT_FEATURED_LIMIT};

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Id of the inline configuration element.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Log level setting for the site scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Portfolio catalog location, relative to the page
    pub data_url: String,

    /// Form backend used when a form has no `data-gform-action`
    pub form_action: String,

    /// Number of featured items shown in the hero carousel
    pub featured_limit: usize,

    /// Autoplay interval when a carousel has no `data-autoplay`
    pub autoplay_ms: u64,

    /// Module URL of the upload widget components
    pub upload_widget_url: String,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_url: "./data/portfolio.json".to_string(),
            form_action: String::new(),
            featured_limit: DEFAULT_FEATURED_LIMIT,
            autoplay_ms: DEFAULT_AUTOPLAY.as_millis() as u64,
            upload_widget_url:
                "https://cdn.jsdelivr.net/npm/@uploadcare/file-uploader@v1/web/file-uploader.min.js"
                    .to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl SiteConfig {
    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Default autoplay interval as a duration. Zero disables autoplay.
    pub fn autoplay_default(&self) -> Option<Duration> {
        (self.autoplay_ms > 0).then(|| Duration::from_millis(self.autoplay_ms))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = SiteConfig::from_json(r#"{ "form_action": "https://forms.example/x", "log_level": "debug" }"#)
            .expect("valid config");
        assert_eq!(config.form_action, "https://forms.example/x");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.featured_limit, DEFAULT_FEATURED_LIMIT);
        assert_eq!(config.data_url, "./data/portfolio.json");
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = SiteConfig::from_json(r#"{ "version": 99 }"#).expect_err("too new");
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SiteConfig::default();
        let json = config.to_json().expect("serializes");
        assert_eq!(SiteConfig::from_json(&json).expect("parses"), config);
    }

    #[test]
    fn test_autoplay_default() {
        assert_eq!(SiteConfig::default().autoplay_default(), Some(DEFAULT_AUTOPLAY));
        let config = SiteConfig {
            autoplay_ms: 0,
            ..SiteConfig::default()
        };
        assert_eq!(config.autoplay_default(), None);
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default().to_level(), log::Level::Info);
    }
}
