//! Normalizer trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::WordbankResult;

/// Canonical form and corpus frequency of a submitted word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    /// Dictionary root form.
    pub canonical: String,
    /// Normalized corpus frequency.
    pub frequency: f64,
}

impl Lookup {
    pub fn new(canonical: impl Into<String>, frequency: f64) -> Self {
        Self {
            canonical: canonical.into(),
            frequency,
        }
    }
}

/// Core normalizer trait - all dictionary providers implement this.
///
/// `Ok(None)` means the dictionary does not know the word. `Err` means the
/// lookup itself failed and may succeed if retried later.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Normalizer: Send + Sync {
    /// Map a raw word to its canonical form and frequency.
    async fn normalize(&self, raw: &str) -> WordbankResult<Option<Lookup>>;

    /// Name of the provider, for logs.
    fn provider_name(&self) -> &str;
}

/// Normalizer provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Application id (Oxford).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Dictionary language code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Tab-separated lexicon file (lexicon provider).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    2
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            base_url: None,
            language: default_language(),
            lexicon_path: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}
