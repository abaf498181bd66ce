//! Application configuration structures.

use std::fs;
use std::path::Path;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Solvers whose solves are collected
    #[serde(default)]
    pub targets: TargetConfig,

    /// Where the solver name and reconstruction live on a solve page
    #[serde(default)]
    pub selectors: PageSelectors,

    /// Checkpoint and batch settings
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Run log settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.crawler.base_url)?;

        if self.targets.solvers.is_empty() {
            return Err(AppError::validation("No target solvers defined"));
        }
        if self.targets.solvers.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::validation("targets.solvers contains a blank name"));
        }

        parse_selector(&self.selectors.solver_name)?;
        parse_selector(&self.selectors.reconstruction)?;
        if self.selectors.zbll_marker.trim().is_empty() {
            return Err(AppError::validation("selectors.zbll_marker is empty"));
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Solve page URL prefix; the solve ID is appended
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Pause after an HTTP 429 before retrying the same ID
    #[serde(default = "defaults::rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            rate_limit_backoff_secs: defaults::rate_limit_backoff(),
        }
    }
}

/// Solvers to collect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Display names, matched exactly against the page
    #[serde(default = "defaults::solvers")]
    pub solvers: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            solvers: defaults::solvers(),
        }
    }
}

/// Solve page structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Element whose text is the solver's display name
    #[serde(default = "defaults::solver_selector")]
    pub solver_name: String,

    /// Element holding the reconstruction text
    #[serde(default = "defaults::reconstruction_selector")]
    pub reconstruction: String,

    /// Comment marking the ZBLL step of a reconstruction
    #[serde(default = "defaults::zbll_marker")]
    pub zbll_marker: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            solver_name: defaults::solver_selector(),
            reconstruction: defaults::reconstruction_selector(),
            zbll_marker: defaults::zbll_marker(),
        }
    }
}

/// Checkpoint and batch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Checkpoint file name, relative to the storage directory
    #[serde(default = "defaults::checkpoint_file")]
    pub checkpoint_file: String,

    /// Checkpoint value assumed when no checkpoint file exists
    #[serde(default = "defaults::default_start_id")]
    pub default_start_id: u64,

    /// How far past the checkpoint a resumed run reaches
    #[serde(default = "defaults::batch_size")]
    pub batch_size: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            checkpoint_file: defaults::checkpoint_file(),
            default_start_id: defaults::default_start_id(),
            batch_size: defaults::batch_size(),
        }
    }
}

/// Run log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file relative to the storage directory, mirrored from the console.
    /// Empty disables the file.
    #[serde(default = "defaults::log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: defaults::log_file(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn base_url() -> String {
        "https://reco.nz/solve/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        500
    }
    pub fn rate_limit_backoff() -> u64 {
        60
    }

    pub fn solvers() -> Vec<String> {
        vec![
            "Tymon Kolasiński".to_string(),
            "Xuanyi Geng".to_string(),
            "Bofan Zhang".to_string(),
            "Qixian Cao".to_string(),
        ]
    }

    // Page structure defaults
    pub fn solver_selector() -> String {
        "a#solver-link".into()
    }
    pub fn reconstruction_selector() -> String {
        "div#reconstruction".into()
    }
    pub fn zbll_marker() -> String {
        "// ZBLL".into()
    }

    pub fn checkpoint_file() -> String {
        "last_id.txt".into()
    }
    pub fn default_start_id() -> u64 {
        12638
    }
    pub fn batch_size() -> u64 {
        500
    }

    pub fn log_file() -> String {
        "scraper.log".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_solvers() {
        let mut config = Config::default();
        config.targets.solvers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.selectors.reconstruction = "[[invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.crawler.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            request_delay_ms = 1000

            [targets]
            solvers = ["Xuanyi Geng"]
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.request_delay_ms, 1000);
        assert_eq!(config.crawler.timeout_secs, 10);
        assert_eq!(config.targets.solvers, vec!["Xuanyi Geng".to_string()]);
        assert_eq!(config.selectors.zbll_marker, "// ZBLL");
        assert_eq!(config.progress.default_start_id, 12638);
    }

    #[test]
    fn bundled_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../storage/config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.solvers.len(), 4);
        assert_eq!(config.logging.file, "scraper.log");
    }

    #[test]
    fn load_fails_on_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/config.toml"),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn logging_file_defaults_and_can_be_disabled() {
        assert_eq!(Config::default().logging.file, "scraper.log");

        let config: Config = toml::from_str("[logging]\nfile = \"\"").unwrap();
        assert!(config.logging.file.is_empty());
    }
}
