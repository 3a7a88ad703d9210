use serde::Deserialize;
use thiserror::Error;

/// Config shipped with the bundle. There is no filesystem in the browser,
/// so the file is embedded at compile time.
const EMBEDDED_CONFIG: &str = include_str!("../../stocktrader.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Trading backend base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Reject logins with an empty password (the password is never sent).
    #[serde(default = "default_true")]
    pub require_password: bool,
    /// Refuse navigation to protected pages until someone has logged in.
    #[serde(default)]
    pub guard_pages: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub buy_layout: BuyLayout,
    #[serde(default)]
    pub sell_layout: SellLayout,
    /// How many ranked entries go into the "top picks" region.
    #[serde(default = "default_top_picks")]
    pub top_picks: usize,
}

/// How buy suggestions are laid out once ranked.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuyLayout {
    /// Top picks first, then everything else in the suggestions region.
    #[default]
    Split,
    /// One list with every suggestion.
    Flat,
}

/// How holdings are laid out on the sell page.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SellLayout {
    /// Ranked by profit, with a quantity selector per card.
    #[default]
    Ranked,
    /// One line per holding, always sells a single share.
    Flat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_true() -> bool {
    true
}
fn default_top_picks() -> usize {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_password: true,
            guard_pages: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            buy_layout: BuyLayout::default(),
            sell_layout: SellLayout::default(),
            top_picks: default_top_picks(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Parse a TOML document and validate it.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Self::from_sources(contents, None, None)
    }

    /// Load the embedded config with build-time environment overrides
    /// applied. The caller decides what to do when it is rejected.
    pub fn try_load() -> Result<Self, ConfigError> {
        Self::from_sources(
            EMBEDDED_CONFIG,
            option_env!("STOCKTRADER_API_URL"),
            option_env!("STOCKTRADER_LOG"),
        )
    }

    /// Parse, overlay, then validate the merged result.
    fn from_sources(
        contents: &str,
        api_url: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        config.apply_overrides(api_url, log_level);
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, api_url: Option<&str>, log_level: Option<&str>) {
        if let Some(url) = api_url.filter(|u| !u.is_empty()) {
            self.api.base_url = url.to_string();
        }
        if let Some(level) = log_level.filter(|l| !l.is_empty()) {
            self.logging.level = level.to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if reqwest::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("{:?} is not an absolute URL", self.api.base_url),
            });
        }
        Ok(())
    }

    /// Log level as understood by the logger; unknown names fall back to info.
    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.display.top_picks, 2);
        assert!(config.session.require_password);
        assert!(!config.session.guard_pages);
    }

    #[test]
    fn test_layouts_and_trailing_slash() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "http://localhost:8000/"

            [display]
            buy_layout = "flat"
            sell_layout = "flat"
            top_picks = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.display.buy_layout, BuyLayout::Flat);
        assert_eq!(config.display.sell_layout, SellLayout::Flat);
        assert_eq!(config.display.top_picks, 3);
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = Config::parse("[api]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api.base_url", .. }));
    }

    #[test]
    fn test_unknown_layout_is_a_parse_error() {
        let err = Config::parse("[display]\nbuy_layout = \"grid\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let config =
            Config::from_sources("", Some("https://trade.example/"), Some("debug")).unwrap();
        assert_eq!(config.api.base_url, "https://trade.example");
        assert_eq!(config.log_level(), tracing::Level::DEBUG);

        let config = Config::from_sources("", Some(""), None).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_bad_url_override_is_rejected() {
        let err = Config::from_sources(EMBEDDED_CONFIG, Some("127.0.0.1 port 5000"), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api.base_url", .. }));
    }

    #[test]
    fn test_embedded_config_parses() {
        assert!(Config::parse(EMBEDDED_CONFIG).is_ok());
    }
}
