use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PulseError;

/// Top-level configuration loaded from `.orgpulse.toml`.
///
/// Resolution order: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use orgpulse_core::PulseConfig;
///
/// let config = PulseConfig::default();
/// assert_eq!(config.analytics.rolling_window_days, 7);
/// assert_eq!(config.analytics.top_contributors, 20);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Record store location and defaults.
    #[serde(default)]
    pub data: DataConfig,
    /// Tunables for the analytics engines.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl PulseConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Io`] if the file cannot be read, or
    /// [`PulseError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use orgpulse_core::PulseConfig;
    /// use std::path::Path;
    ///
    /// let config = PulseConfig::from_file(Path::new(".orgpulse.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, PulseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgpulse_core::PulseConfig;
    ///
    /// let toml = r#"
    /// [analytics]
    /// top_contributors = 10
    /// "#;
    /// let config = PulseConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.analytics.top_contributors, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, PulseError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Record store configuration.
///
/// # Examples
///
/// ```
/// use orgpulse_core::DataConfig;
///
/// let config = DataConfig::default();
/// assert_eq!(config.dir.to_str(), Some("."));
/// assert!(config.default_org.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding `repositories.json`, `commits.json`, and
    /// (optionally) `contributors.json`.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    /// Organization assumed when the CLI omits `--org`.
    #[serde(default)]
    pub default_org: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            default_org: None,
        }
    }
}

/// Tunables for the analytics engines.
///
/// # Examples
///
/// ```
/// use orgpulse_core::AnalyticsConfig;
///
/// let config = AnalyticsConfig::default();
/// assert_eq!(config.rolling_window_days, 7);
/// assert_eq!(config.business_hours, [9, 17]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Window width for the rolling commit trend (default: 7 days).
    #[serde(default = "default_rolling_window")]
    pub rolling_window_days: usize,
    /// Size of the top-contributor projection (default: 20).
    #[serde(default = "default_top_contributors")]
    pub top_contributors: usize,
    /// How many contributors get a weekly activity series (default: 5).
    #[serde(default = "default_trend_contributors")]
    pub trend_contributors: usize,
    /// Inclusive `[start, end]` hours counted as business hours
    /// (default: `[9, 17]`, i.e. 09:00–17:59).
    #[serde(default = "default_business_hours")]
    pub business_hours: [u32; 2],
}

fn default_rolling_window() -> usize {
    7
}

fn default_top_contributors() -> usize {
    20
}

fn default_trend_contributors() -> usize {
    5
}

fn default_business_hours() -> [u32; 2] {
    [9, 17]
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window(),
            top_contributors: default_top_contributors(),
            trend_contributors: default_trend_contributors(),
            business_hours: default_business_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = PulseConfig::default();
        assert_eq!(config.analytics.rolling_window_days, 7);
        assert_eq!(config.analytics.top_contributors, 20);
        assert_eq!(config.analytics.trend_contributors, 5);
        assert_eq!(config.analytics.business_hours, [9, 17]);
        assert_eq!(config.data.dir, PathBuf::from("."));
        assert!(config.data.default_org.is_none());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[data]
dir = "github_data"
default_org = "acme"
"#;
        let config = PulseConfig::from_toml(toml).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("github_data"));
        assert_eq!(config.data.default_org.as_deref(), Some("acme"));
        assert_eq!(config.analytics.rolling_window_days, 7);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[data]
dir = "records"
default_org = "acme"

[analytics]
rolling_window_days = 14
top_contributors = 10
trend_contributors = 3
business_hours = [8, 16]
"#;
        let config = PulseConfig::from_toml(toml).unwrap();
        assert_eq!(config.analytics.rolling_window_days, 14);
        assert_eq!(config.analytics.top_contributors, 10);
        assert_eq!(config.analytics.trend_contributors, 3);
        assert_eq!(config.analytics.business_hours, [8, 16]);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = PulseConfig::from_toml("").unwrap();
        assert_eq!(config.analytics.top_contributors, 20);
        assert_eq!(config.data.dir, PathBuf::from("."));
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = PulseConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }
}
