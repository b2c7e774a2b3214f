//! Configuration file support for the decision-support engine.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/health-dss/config.toml`.
//! Every default reproduces the reference constants of the engine.

use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for every day-count setting (about a century)
pub const MAX_DAY_SPAN: i64 = 36_500;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub risk: RiskConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Symptom matching and urgency parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Diseases must score strictly above this to be ranked
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f64,

    #[serde(default = "default_max_ranked")]
    pub max_ranked: usize,

    /// Cap match scores at 1.0 (the critical-symptom bonus can push them higher)
    #[serde(default)]
    pub clamp_match_score: bool,

    /// Symptoms older than this many days add the persistence bonus
    #[serde(default = "default_persistent_after_days")]
    pub persistent_after_days: i64,

    #[serde(default = "default_insight_ttl_days")]
    pub insight_ttl_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_match_score: default_min_match_score(),
            max_ranked: default_max_ranked(),
            clamp_match_score: false,
            persistent_after_days: default_persistent_after_days(),
            insight_ttl_days: default_insight_ttl_days(),
        }
    }
}

/// Risk prediction parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskConfig {
    /// How far back metric history is read for predictions
    #[serde(default = "default_metric_window_days")]
    pub metric_window_days: i64,
}

impl RiskConfig {
    /// Oldest measurement time read for predictions, saturating at the
    /// earliest representable instant
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(self.metric_window_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            metric_window_days: default_metric_window_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("health-dss")
}

fn default_min_match_score() -> f64 {
    0.3
}

fn default_max_ranked() -> usize {
    5
}

fn default_persistent_after_days() -> i64 {
    7
}

fn default_insight_ttl_days() -> i64 {
    7
}

fn default_metric_window_days() -> i64 {
    180
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(std::env::temp_dir);
        base.join("health-dss").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values that would make the scorers meaningless
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        if !(0.0..1.0).contains(&analysis.min_match_score) {
            return Err(Error::Config(format!(
                "analysis.min_match_score must be in [0, 1), got {}",
                analysis.min_match_score
            )));
        }
        if analysis.max_ranked == 0 {
            return Err(Error::Config("analysis.max_ranked must be at least 1".into()));
        }
        for (name, days) in [
            ("analysis.persistent_after_days", analysis.persistent_after_days),
            ("analysis.insight_ttl_days", analysis.insight_ttl_days),
        ] {
            if !(0..=MAX_DAY_SPAN).contains(&days) {
                return Err(Error::Config(format!(
                    "{} must be in [0, {}], got {}",
                    name, MAX_DAY_SPAN, days
                )));
            }
        }
        if !(1..=MAX_DAY_SPAN).contains(&self.risk.metric_window_days) {
            return Err(Error::Config(format!(
                "risk.metric_window_days must be in [1, {}], got {}",
                MAX_DAY_SPAN, self.risk.metric_window_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.min_match_score, 0.3);
        assert_eq!(config.analysis.max_ranked, 5);
        assert!(!config.analysis.clamp_match_score);
        assert_eq!(config.analysis.persistent_after_days, 7);
        assert_eq!(config.risk.metric_window_days, 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.analysis.clamp_match_score = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.analysis.clamp_match_score);
        assert_eq!(loaded.analysis.max_ranked, config.analysis.max_ranked);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[analysis]
max_ranked = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analysis.max_ranked, 3);
        assert_eq!(config.analysis.min_match_score, 0.3); // default
        assert_eq!(config.risk.metric_window_days, 180); // default
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nmax_ranked = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_day_counts_have_upper_bound() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        for contents in [
            "[analysis]\npersistent_after_days = 1000000000\n",
            "[analysis]\ninsight_ttl_days = 1000000000\n",
            "[risk]\nmetric_window_days = 1000000000\n",
        ] {
            std::fs::write(&path, contents).unwrap();
            let result = Config::load_from(&path);
            assert!(matches!(result, Err(Error::Config(_))), "{}", contents);
        }

        let mut config = Config::default();
        config.analysis.insight_ttl_days = MAX_DAY_SPAN;
        config.risk.metric_window_days = MAX_DAY_SPAN;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_start_saturates() {
        let now = Utc::now();
        let risk = RiskConfig::default();
        assert_eq!(risk.window_start(now), now - Duration::days(180));

        let huge = RiskConfig {
            metric_window_days: i64::MAX,
        };
        assert_eq!(huge.window_start(now), DateTime::<Utc>::MIN_UTC);
    }
}
