//! Run configuration from a JSON file and command-line overrides.

use contagion::ConnectednessConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    /// Config file could not be opened.
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid JSON for a run configuration.
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Values given on the command line; `None` keeps the file or default value.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub bandwidth: Option<usize>,
    pub significance: Option<f64>,
    pub robust: bool,
    pub strength_threshold: Option<f64>,
    pub lags: Option<usize>,
    pub threads: Option<usize>,
    pub analyze: bool,
}

impl Overrides {
    /// Apply to `config`. Flags only ever switch booleans on.
    pub(crate) fn apply(&self, mut config: ConnectednessConfig) -> ConnectednessConfig {
        if let Some(bandwidth) = self.bandwidth {
            config.bandwidth = bandwidth;
        }
        if let Some(significance) = self.significance {
            config.significance = significance;
        }
        if let Some(strength) = self.strength_threshold {
            config.strength_threshold = strength;
        }
        if let Some(lags) = self.lags {
            config.lags = lags;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config.robust |= self.robust;
        config.analyze |= self.analyze;
        config
    }
}

/// Load the base configuration from `path`, or defaults without a file,
/// then apply `overrides`. Validation happens in the engine.
pub(crate) fn resolve(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<ConnectednessConfig, SettingsError> {
    let base = match path {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => ConnectednessConfig::default(),
    };
    Ok(overrides.apply(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, &Overrides::default()).unwrap();
        assert_eq!(config, ConnectednessConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            bandwidth: Some(60),
            robust: true,
            threads: Some(2),
            ..Default::default()
        };
        let config = overrides.apply(ConnectednessConfig {
            significance: 0.01,
            ..Default::default()
        });
        assert_eq!(config.bandwidth, 60);
        assert!(config.robust);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.significance, 0.01);
    }

    #[test]
    fn test_file_then_overrides() {
        let path = std::env::temp_dir()
            .join(format!("contagion-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"bandwidth": 100, "lags": 2}"#).unwrap();

        let overrides = Overrides {
            lags: Some(3),
            ..Default::default()
        };
        let config = resolve(Some(&path), &overrides).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.bandwidth, 100);
        assert_eq!(config.lags, 3);
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/contagion.json");
        assert!(matches!(
            resolve(Some(path), &Overrides::default()),
            Err(SettingsError::Io(_))
        ));
    }
}
