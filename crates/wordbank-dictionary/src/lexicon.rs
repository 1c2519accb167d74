//! Offline normalizer backed by a tab-separated lexicon file.
//!
//! Each non-comment line is `raw<TAB>canonical<TAB>frequency`. Raw forms are
//! matched case-insensitively.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use wordbank_core::error::{WordbankError, WordbankResult};
use wordbank_core::traits::{Lookup, Normalizer, NormalizerConfig};

/// Normalizer answering from an in-memory lexicon.
#[derive(Debug, Clone, Default)]
pub struct LexiconNormalizer {
    entries: HashMap<String, Lookup>,
}

impl LexiconNormalizer {
    /// Load the lexicon named by `lexicon_path`.
    pub fn new(config: NormalizerConfig) -> WordbankResult<Self> {
        let path = config.lexicon_path.ok_or_else(|| {
            WordbankError::Configuration("Lexicon provider requires lexicon_path".to_string())
        })?;
        Self::from_path(path)
    }

    /// Load a lexicon file.
    pub fn from_path(path: impl AsRef<Path>) -> WordbankResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let lexicon = Self::parse(&content)?;
        debug!(path = %path.as_ref().display(), entries = lexicon.len(), "Loaded lexicon");
        Ok(lexicon)
    }

    /// Parse lexicon text. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> WordbankResult<Self> {
        let mut entries = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [raw, canonical, frequency] = fields[..] else {
                return Err(WordbankError::parse(format!(
                    "Lexicon line {}: expected 3 tab-separated fields, found {}",
                    index + 1,
                    fields.len()
                )));
            };
            let frequency: f64 = frequency.parse().map_err(|_| {
                WordbankError::parse(format!(
                    "Lexicon line {}: invalid frequency '{}'",
                    index + 1,
                    frequency
                ))
            })?;
            if raw.is_empty() || canonical.is_empty() {
                return Err(WordbankError::parse(format!("Lexicon line {}: empty word", index + 1)));
            }

            entries.insert(raw.to_lowercase(), Lookup::new(canonical, frequency));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Normalizer for LexiconNormalizer {
    async fn normalize(&self, raw: &str) -> WordbankResult<Option<Lookup>> {
        Ok(self.entries.get(&raw.trim().to_lowercase()).cloned())
    }

    fn provider_name(&self) -> &str {
        "lexicon"
    }
}
