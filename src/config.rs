//! Runtime configuration: upstream URLs, caps, intervals, and HTTP settings.
//!
//! Configuration comes from an optional YAML file. Every key has a working
//! default, so a missing file or a partial file still produces a runnable
//! setup; the file only needs to override what differs per deployment.
//!
//! # Example
//!
//! ```yaml
//! refresh_interval_mins: 30
//! query_ttl_secs: 60
//! http:
//!   timeout_secs: 20
//! general:
//!   cap: 6
//!   structured_url: https://www.moneycontrol.com/mcapi/v1/news/list?category=markets
//! derivative:
//!   cap: 4
//! ```

use serde::Deserialize;
use std::error::Error;
use tracing::info;
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Wall-clock period of the background refresh loop, in minutes.
    pub refresh_interval_mins: u64,
    /// Staleness threshold for the TTL-gated read path, in seconds.
    pub query_ttl_secs: u64,
    pub http: HttpConfig,
    #[serde(deserialize_with = "general_section")]
    pub general: CategoryConfig,
    #[serde(deserialize_with = "derivative_section")]
    pub derivative: CategoryConfig,
}

/// Settings for the shared HTTP client and per-request headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout. Keeps a hung upstream from wedging a refresh cycle.
    pub timeout_secs: u64,
    /// Browser-like user agent sent to structured endpoints.
    pub browser_user_agent: String,
    /// Plain user agent sent to markup pages.
    pub plain_user_agent: String,
}

/// One category's upstreams and result cap.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    /// Maximum records served for this category.
    pub cap: usize,
    /// Primary JSON feed.
    pub structured_url: String,
    /// Listing page scraped when the feed fails.
    pub markup_url: String,
    /// Page for the degraded anchor sweep; no ultimate fallback when absent.
    pub fallback_url: Option<String>,
}

impl CategoryConfig {
    fn general_defaults() -> Self {
        Self {
            cap: 6,
            structured_url: "https://www.moneycontrol.com/mcapi/v1/news/list?category=markets"
                .to_string(),
            markup_url: "https://www.moneycontrol.com/news/business/markets/".to_string(),
            fallback_url: Some("https://www.moneycontrol.com/news/".to_string()),
        }
    }

    fn derivative_defaults() -> Self {
        Self {
            cap: 4,
            structured_url: "https://www.moneycontrol.com/mcapi/v1/news/list?category=derivatives"
                .to_string(),
            markup_url: "https://www.moneycontrol.com/news/business/derivatives/".to_string(),
            fallback_url: None,
        }
    }
}

/// A category section as written in the file. Every field is optional and
/// merged onto that category's own defaults, so a partial section never
/// inherits the other category's endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CategoryOverrides {
    cap: Option<usize>,
    structured_url: Option<String>,
    markup_url: Option<String>,
    fallback_url: Option<String>,
}

impl CategoryOverrides {
    fn onto(self, mut base: CategoryConfig) -> CategoryConfig {
        if let Some(cap) = self.cap {
            base.cap = cap;
        }
        if let Some(url) = self.structured_url {
            base.structured_url = url;
        }
        if let Some(url) = self.markup_url {
            base.markup_url = url;
        }
        if let Some(url) = self.fallback_url {
            base.fallback_url = Some(url);
        }
        base
    }
}

fn general_section<'de, D>(deserializer: D) -> Result<CategoryConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    CategoryOverrides::deserialize(deserializer)
        .map(|overrides| overrides.onto(CategoryConfig::general_defaults()))
}

fn derivative_section<'de, D>(deserializer: D) -> Result<CategoryConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    CategoryOverrides::deserialize(deserializer)
        .map(|overrides| overrides.onto(CategoryConfig::derivative_defaults()))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_mins: 30,
            query_ttl_secs: 60,
            http: HttpConfig::default(),
            general: CategoryConfig::general_defaults(),
            derivative: CategoryConfig::derivative_defaults(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            browser_user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
            plain_user_agent: "Mozilla/5.0 (compatible; market_headlines/0.1)".to_string(),
        }
    }
}

/// Load configuration, falling back to defaults when no path is given.
///
/// # Errors
///
/// Returns an error when the file cannot be read, does not parse as YAML,
/// or contains an invalid upstream URL.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let config: AppConfig = serde_yaml::from_str(&raw)?;
            info!(%path, "Loaded configuration file");
            config
        }
        None => {
            info!("No configuration file given; using defaults");
            AppConfig::default()
        }
    };
    validate(&config)?;
    Ok(config)
}

/// Check upstream URLs and bounds.
///
/// Runs as part of [`load_config`] and must run again after any mutation of
/// a loaded configuration, such as a CLI interval override.
pub fn validate(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    for (name, url) in [
        ("general.structured_url", Some(&config.general.structured_url)),
        ("general.markup_url", Some(&config.general.markup_url)),
        ("general.fallback_url", config.general.fallback_url.as_ref()),
        (
            "derivative.structured_url",
            Some(&config.derivative.structured_url),
        ),
        ("derivative.markup_url", Some(&config.derivative.markup_url)),
        (
            "derivative.fallback_url",
            config.derivative.fallback_url.as_ref(),
        ),
    ] {
        if let Some(url) = url {
            Url::parse(url).map_err(|e| format!("{name} is not a valid URL ({e}): {url}"))?;
        }
    }
    if config.refresh_interval_mins == 0 {
        return Err("refresh_interval_mins must be at least 1".into());
    }
    if config.http.timeout_secs == 0 {
        return Err("http.timeout_secs must be at least 1".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.general.cap, 6);
        assert_eq!(config.derivative.cap, 4);
        assert_eq!(config.refresh_interval_mins, 30);
        assert_eq!(config.query_ttl_secs, 60);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
refresh_interval_mins: 5
general:
  cap: 3
"#,
        )
        .unwrap();
        assert_eq!(config.refresh_interval_mins, 5);
        assert_eq!(config.general.cap, 3);
        assert_eq!(config.derivative.cap, 4);
        assert_eq!(config.http.timeout_secs, 20);
    }

    #[test]
    fn test_partial_derivative_keeps_derivative_endpoints() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
derivative:
  cap: 2
"#,
        )
        .unwrap();
        assert_eq!(config.derivative.cap, 2);
        assert!(config.derivative.structured_url.contains("category=derivatives"));
        assert!(config.derivative.markup_url.contains("/derivatives/"));
        assert!(config.derivative.fallback_url.is_none());
        assert_eq!(config.general.cap, 6);
        assert!(config.general.structured_url.contains("category=markets"));
    }

    #[test]
    fn test_unknown_keys_in_category_section_are_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str(
            r#"
general:
  caps: 3
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut config = AppConfig::default();
        config.derivative.structured_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.refresh_interval_mins = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("unexpected_key: true");
        assert!(result.is_err());
    }
}
