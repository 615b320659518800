//! Loading configuration files from disk.

use std::path::PathBuf;

use tempfile::TempDir;

use growthlab_runner::config::{ConfigError, GrowthConfig, ProviderSource};

/// Write `config.toml` into a fresh temp dir. Keep the `TempDir` alive for
/// as long as the path is used; dropping it removes the directory.
fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn explicit_file_overrides_defaults() {
    let (_dir, path) = write_config(
        r#"
[provider]
source = "csv"
csv_dir = "/srv/prices"

[comparator]
symbols = "KO, PEP"
include_dividends = true
"#,
    );
    let config = GrowthConfig::load(Some(&path)).unwrap();
    assert_eq!(config.provider.source, ProviderSource::Csv);
    assert_eq!(config.provider.csv_dir, PathBuf::from("/srv/prices"));
    assert_eq!(config.comparator.symbols, "KO, PEP");
    assert!(config.comparator.include_dividends);
    assert_eq!(config.simulator.min_investment, 1.0);
}

#[test]
fn malformed_file_is_parse_error() {
    let (_dir, path) = write_config("[provider\nsource = ");
    assert!(matches!(
        GrowthConfig::load(Some(&path)),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn zero_minimum_investment_is_invalid() {
    let (_dir, path) = write_config("[simulator]\nmin_investment = 0.0\ninitial_investment = 0.0\n");
    assert!(matches!(
        GrowthConfig::load(Some(&path)),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn written_defaults_load_back() {
    let text = GrowthConfig::default().to_toml().unwrap();
    let (_dir, path) = write_config(&text);
    assert_eq!(GrowthConfig::load(Some(&path)).unwrap(), GrowthConfig::default());
}
