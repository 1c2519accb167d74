//! Configuration system for wordbank.
//!
//! All parameters are plain typed values, loaded once at startup and checked
//! by [`WordbankConfig::validate`] before anything runs.

mod vocabulary;

pub use vocabulary::{Command, Vocabulary};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{WordbankError, WordbankResult};
use crate::traits::NormalizerConfig;

/// Upper bound accepted for any interval, in seconds (about 100 years).
const MAX_INTERVAL_SECS: u64 = 3_153_600_000;

/// Review scheduling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Cooldown after the first success (INIT).
    pub repeat_init_secs: u64,
    /// Growth factor per further success (MULT).
    pub repeat_mult: f64,
    /// Cap on the success cooldown (MAX).
    pub repeat_max_secs: u64,
    /// Cooldown after a failure (WRONG_COOLDOWN).
    pub wrong_cooldown_secs: u64,
    /// Working-set size new words are admitted up to (MIN_AVAILABLE).
    pub min_available: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            repeat_init_secs: 60 * 60,
            repeat_mult: 4.0,
            repeat_max_secs: 30 * 24 * 60 * 60,
            wrong_cooldown_secs: 5 * 60,
            min_available: 10,
        }
    }
}

impl ReviewConfig {
    /// Cooldown for a word with `success_count` successes:
    /// `min(INIT * MULT^(success_count - 1), MAX)`.
    pub fn repeat_interval(&self, success_count: usize) -> Duration {
        let exponent = success_count.saturating_sub(1).min(i32::MAX as usize) as i32;
        let secs = self.repeat_init_secs as f64 * self.repeat_mult.powi(exponent);
        let capped = secs.min(self.repeat_max_secs as f64);
        Duration::milliseconds((capped * 1000.0).round() as i64)
    }

    /// Cooldown after a failure.
    pub fn wrong_cooldown(&self) -> Duration {
        Duration::seconds(self.wrong_cooldown_secs as i64)
    }

    pub fn validate(&self) -> WordbankResult<()> {
        if self.repeat_init_secs == 0 {
            return Err(WordbankError::Configuration(
                "review.repeat_init_secs must be positive".to_string(),
            ));
        }
        if !self.repeat_mult.is_finite() || self.repeat_mult < 1.0 {
            return Err(WordbankError::Configuration(format!(
                "review.repeat_mult must be a finite number >= 1, got {}",
                self.repeat_mult
            )));
        }
        if self.repeat_max_secs < self.repeat_init_secs {
            return Err(WordbankError::Configuration(
                "review.repeat_max_secs must not be smaller than review.repeat_init_secs"
                    .to_string(),
            ));
        }
        if self.repeat_max_secs > MAX_INTERVAL_SECS || self.wrong_cooldown_secs > MAX_INTERVAL_SECS
        {
            return Err(WordbankError::Configuration(
                "review intervals must not exceed 100 years".to_string(),
            ));
        }
        if self.min_available == 0 {
            return Err(WordbankError::Configuration(
                "review.min_available must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// Seconds between periodic snapshots.
    pub snapshot_interval_secs: u64,
    /// Take a snapshot as soon as the scheduler starts.
    pub snapshot_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let wordbank_dir = dirs::home_dir()
            .map(|h| h.join(".wordbank"))
            .unwrap_or_else(|| PathBuf::from(".wordbank"));

        Self {
            db_path: Some(wordbank_dir.join("wordbank.db")),
            snapshot_interval_secs: 5 * 60,
            snapshot_on_start: false,
        }
    }
}

/// Normalizer provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerProvider {
    #[default]
    Oxford,
    Lexicon,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NormalizerProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: NormalizerProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: NormalizerConfig,
}

/// Main wordbank configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WordbankConfig {
    /// Scheduling parameters.
    pub review: ReviewConfig,
    /// Reply tokens.
    pub vocabulary: Vocabulary,
    /// Snapshot storage.
    pub storage: StorageConfig,
    /// Dictionary provider.
    pub normalizer: NormalizerProviderConfig,
}

impl WordbankConfig {
    /// Load configuration from a file (TOML, JSON, or YAML) and validate it.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> WordbankResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| WordbankError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| WordbankError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| WordbankError::Configuration(e.to_string()))?,
            _ => {
                return Err(WordbankError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables and validate it.
    pub fn from_env() -> WordbankResult<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_parse("WORDBANK_REPEAT_INIT_SECS") {
            config.review.repeat_init_secs = secs;
        }
        if let Some(mult) = env_parse("WORDBANK_REPEAT_MULT") {
            config.review.repeat_mult = mult;
        }
        if let Some(secs) = env_parse("WORDBANK_REPEAT_MAX_SECS") {
            config.review.repeat_max_secs = secs;
        }
        if let Some(secs) = env_parse("WORDBANK_WRONG_COOLDOWN_SECS") {
            config.review.wrong_cooldown_secs = secs;
        }
        if let Some(count) = env_parse("WORDBANK_MIN_AVAILABLE") {
            config.review.min_available = count;
        }

        // Storage
        if let Ok(path) = std::env::var("WORDBANK_DB_PATH") {
            config.storage.db_path = match path.as_str() {
                "" | ":memory:" => None,
                _ => Some(PathBuf::from(path)),
            };
        }
        if let Some(secs) = env_parse("WORDBANK_SNAPSHOT_INTERVAL_SECS") {
            config.storage.snapshot_interval_secs = secs;
        }

        // Normalizer
        if let Ok(provider) = std::env::var("WORDBANK_NORMALIZER_PROVIDER") {
            config.normalizer.provider = match provider.to_lowercase().as_str() {
                "lexicon" => NormalizerProvider::Lexicon,
                _ => NormalizerProvider::Oxford,
            };
        }
        if let Ok(path) = std::env::var("WORDBANK_LEXICON_PATH") {
            config.normalizer.config.lexicon_path = Some(PathBuf::from(path));
        }
        if let Ok(app_id) = std::env::var("OXFORD_APP_ID") {
            config.normalizer.config.app_id = Some(app_id);
        }
        if let Ok(key) = std::env::var("OXFORD_APP_KEY") {
            config.normalizer.config.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> WordbankConfigBuilder {
        WordbankConfigBuilder::default()
    }

    /// Check every section.
    pub fn validate(&self) -> WordbankResult<()> {
        self.review.validate()?;
        self.vocabulary.validate()?;
        if self.storage.snapshot_interval_secs == 0 {
            return Err(WordbankError::Configuration(
                "storage.snapshot_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for WordbankConfig.
#[derive(Default)]
pub struct WordbankConfigBuilder {
    config: WordbankConfig,
}

impl WordbankConfigBuilder {
    /// Set scheduling parameters.
    pub fn review(mut self, review: ReviewConfig) -> Self {
        self.config.review = review;
        self
    }

    /// Set reply vocabulary.
    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.config.vocabulary = vocabulary;
        self
    }

    /// Set the SQLite path (`None` for in-memory).
    pub fn db_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.storage.db_path = path;
        self
    }

    /// Set the snapshot interval.
    pub fn snapshot_interval_secs(mut self, secs: u64) -> Self {
        self.config.storage.snapshot_interval_secs = secs;
        self
    }

    /// Set the normalizer provider.
    pub fn normalizer(mut self, normalizer: NormalizerProviderConfig) -> Self {
        self.config.normalizer = normalizer;
        self
    }

    /// Validate and build.
    pub fn build(self) -> WordbankResult<WordbankConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn review(init: u64, mult: f64, max: u64) -> ReviewConfig {
        ReviewConfig {
            repeat_init_secs: init,
            repeat_mult: mult,
            repeat_max_secs: max,
            ..Default::default()
        }
    }

    #[test]
    fn test_repeat_interval_grows_and_caps() {
        let config = review(100, 4.0, 10_000);
        assert_eq!(config.repeat_interval(1), Duration::seconds(100));
        assert_eq!(config.repeat_interval(2), Duration::seconds(400));
        assert_eq!(config.repeat_interval(3), Duration::seconds(1600));
        assert_eq!(config.repeat_interval(4), Duration::seconds(6400));
        assert_eq!(config.repeat_interval(5), Duration::seconds(10_000));
        assert_eq!(config.repeat_interval(500), Duration::seconds(10_000));
    }

    #[test]
    fn test_review_validation() {
        assert!(ReviewConfig::default().validate().is_ok());
        assert!(review(0, 4.0, 100).validate().is_err());
        assert!(review(100, 0.5, 1000).validate().is_err());
        assert!(review(100, f64::NAN, 1000).validate().is_err());
        assert!(review(100, 2.0, 50).validate().is_err());

        let no_working_set = ReviewConfig {
            min_available: 0,
            ..Default::default()
        };
        assert!(no_working_set.validate().is_err());
    }

    #[test]
    fn test_builder_validates() {
        let config = WordbankConfig::builder()
            .db_path(None)
            .review(review(100, 4.0, 10_000))
            .build()
            .unwrap();
        assert!(config.storage.db_path.is_none());
        assert_eq!(config.review.repeat_init_secs, 100);

        assert!(WordbankConfig::builder()
            .snapshot_interval_secs(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[review]
repeat_init_secs = 100
repeat_mult = 4.0
repeat_max_secs = 10000
wrong_cooldown_secs = 50
min_available = 2

[vocabulary]
yes = ["da"]

[storage]
snapshot_interval_secs = 60

[normalizer]
provider = "lexicon"
lexicon_path = "/tmp/words.tsv"
"#
        )
        .unwrap();

        let config = WordbankConfig::from_file(file.path()).unwrap();
        assert_eq!(config.review.wrong_cooldown_secs, 50);
        assert_eq!(config.review.min_available, 2);
        assert_eq!(config.vocabulary.parse("DA"), Command::Yes);
        assert_eq!(config.vocabulary.parse("n"), Command::No);
        assert_eq!(config.storage.snapshot_interval_secs, 60);
        assert_eq!(config.normalizer.provider, NormalizerProvider::Lexicon);
        assert_eq!(config.normalizer.config.language, "en");
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"review": {{"repeat_mult": 0.5}}}}"#).unwrap();
        assert!(matches!(
            WordbankConfig::from_file(file.path()),
            Err(WordbankError::Configuration(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(WordbankConfig::from_file(file.path()).is_err());
    }
}
