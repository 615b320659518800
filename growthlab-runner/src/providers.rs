//! Provider construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use growthlab_core::data::{
    CircuitBreaker, CsvProvider, DataError, DataProvider, SyntheticProvider, YahooConfig,
    YahooProvider,
};

use crate::config::{ProviderConfig, ProviderSource};

/// Consecutive failures before the Yahoo breaker opens.
const BREAKER_FAILURE_THRESHOLD: u32 = 3;

/// Build the provider named by `config.source`.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn DataProvider>, DataError> {
    let provider: Box<dyn DataProvider> = match config.source {
        ProviderSource::Yahoo => {
            let breaker = Arc::new(CircuitBreaker::new(
                Duration::from_secs(config.breaker_cooldown_secs),
                BREAKER_FAILURE_THRESHOLD,
            ));
            let yahoo = YahooConfig {
                timeout: Duration::from_secs(config.timeout_secs),
                max_retries: config.max_retries,
                ..YahooConfig::default()
            };
            Box::new(YahooProvider::new(breaker, yahoo)?)
        }
        ProviderSource::Csv => Box::new(CsvProvider::new(config.csv_dir.clone())),
        ProviderSource::Synthetic => Box::new(SyntheticProvider::new()),
    };
    tracing::debug!(provider = provider.name(), "provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_offline_source() {
        let mut config = ProviderConfig {
            source: ProviderSource::Synthetic,
            ..ProviderConfig::default()
        };
        assert_eq!(build_provider(&config).unwrap().name(), "synthetic");

        config.source = ProviderSource::Csv;
        assert_eq!(build_provider(&config).unwrap().name(), "csv_import");
    }
}
