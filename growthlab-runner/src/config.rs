//! TOML configuration: provider selection and default pipeline inputs.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulator::DEFAULT_MIN_INVESTMENT;

/// Upper bound on `provider.max_retries`; keeps the backoff delay sane.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which data provider answers fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

impl ProviderSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Some(ProviderSource::Yahoo),
            "csv" => Some(ProviderSource::Csv),
            "synthetic" => Some(ProviderSource::Synthetic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProviderSource::Yahoo => "yahoo",
            ProviderSource::Csv => "csv",
            ProviderSource::Synthetic => "synthetic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: ProviderSource,
    /// Directory of `<SYMBOL>.csv` files for the `csv` source.
    pub csv_dir: PathBuf,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub breaker_cooldown_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: ProviderSource::Yahoo,
            csv_dir: PathBuf::from("data"),
            timeout_secs: 30,
            max_retries: 3,
            breaker_cooldown_secs: 30 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorDefaults {
    /// Comma-separated, as typed into the form.
    pub symbols: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_dividends: bool,
    pub initial_investment: f64,
}

impl Default for ComparatorDefaults {
    fn default() -> Self {
        Self {
            symbols: "AAPL, TSM, MSFT".to_string(),
            start: date(2020, 1, 1),
            end: date(2023, 1, 1),
            include_dividends: false,
            initial_investment: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorDefaults {
    pub symbol: String,
    pub start: NaiveDate,
    /// `None` runs through today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    pub initial_investment: f64,
    pub min_investment: f64,
}

impl Default for SimulatorDefaults {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            start: date(2020, 1, 1),
            end: None,
            initial_investment: 1000.0,
            min_investment: DEFAULT_MIN_INVESTMENT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub provider: ProviderConfig,
    pub comparator: ComparatorDefaults,
    pub simulator: SimulatorDefaults,
}

impl GrowthConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GrowthConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// `<config_dir>/growthlab/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("growthlab").join("config.toml"))
    }

    /// Explicit path if given (must exist), else the default path if it
    /// exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be positive".into()));
        }
        if self.provider.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "provider.max_retries must be at most {MAX_RETRIES} (got {})",
                self.provider.max_retries
            )));
        }
        let min = self.simulator.min_investment;
        if !(min.is_finite() && min > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "simulator.min_investment must be positive (got {min})"
            )));
        }
        if !(self.comparator.initial_investment.is_finite()
            && self.comparator.initial_investment >= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "comparator.initial_investment must be non-negative (got {})",
                self.comparator.initial_investment
            )));
        }
        if !(self.simulator.initial_investment.is_finite()
            && self.simulator.initial_investment >= min)
        {
            return Err(ConfigError::Invalid(format!(
                "simulator.initial_investment must be at least {min} (got {})",
                self.simulator.initial_investment
            )));
        }
        if self.comparator.end <= self.comparator.start {
            return Err(ConfigError::Invalid(
                "comparator.end must be after comparator.start".into(),
            ));
        }
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(GrowthConfig::from_toml("").unwrap(), GrowthConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = GrowthConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(GrowthConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GrowthConfig::from_toml(
            r#"
            [provider]
            source = "synthetic"

            [simulator]
            symbol = "KO"
            end = "2024-06-30"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.source, ProviderSource::Synthetic);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.simulator.symbol, "KO");
        assert_eq!(config.simulator.end, Some(date(2024, 6, 30)));
        assert_eq!(config.comparator, ComparatorDefaults::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            GrowthConfig::from_toml("[provider]\nsource = \"bloomberg\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GrowthConfig::from_toml("[simulator]\ninitial_investment = 0.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GrowthConfig::from_toml("[simulator]\nmin_investment = 0.0\ninitial_investment = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GrowthConfig::from_toml("[provider]\nmax_retries = 40"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GrowthConfig::from_toml("[comparator]\nstart = \"2024-01-01\"\nend = \"2023-01-01\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_io_error() {
        let err = GrowthConfig::load(Some(Path::new("/nonexistent/growthlab.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn source_parsing() {
        assert_eq!(ProviderSource::parse("CSV"), Some(ProviderSource::Csv));
        assert_eq!(ProviderSource::parse(" yahoo "), Some(ProviderSource::Yahoo));
        assert_eq!(ProviderSource::parse("x"), None);
    }
}
