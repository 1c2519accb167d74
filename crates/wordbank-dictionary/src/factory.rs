//! Factory for creating normalizer providers.

use std::sync::Arc;

use wordbank_core::config::{NormalizerProvider, NormalizerProviderConfig};
use wordbank_core::error::WordbankResult;
use wordbank_core::traits::{Normalizer, NormalizerConfig};

use crate::lexicon::LexiconNormalizer;
use crate::oxford::OxfordDictionary;

/// Factory for creating normalizer providers.
pub struct NormalizerFactory;

impl NormalizerFactory {
    /// Create a normalizer from the given configuration.
    pub fn create(
        provider: NormalizerProvider,
        config: NormalizerConfig,
    ) -> WordbankResult<Arc<dyn Normalizer>> {
        match provider {
            NormalizerProvider::Oxford => {
                let normalizer = OxfordDictionary::new(config)?;
                Ok(Arc::new(normalizer))
            }
            NormalizerProvider::Lexicon => {
                let normalizer = LexiconNormalizer::new(config)?;
                Ok(Arc::new(normalizer))
            }
        }
    }

    /// Create the normalizer named by a provider config section.
    pub fn from_config(config: &NormalizerProviderConfig) -> WordbankResult<Arc<dyn Normalizer>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an Oxford normalizer with credentials from the environment.
    pub fn oxford() -> WordbankResult<Arc<dyn Normalizer>> {
        Self::create(NormalizerProvider::Oxford, NormalizerConfig::default())
    }

    /// Create a lexicon normalizer from a file.
    pub fn lexicon(path: impl Into<std::path::PathBuf>) -> WordbankResult<Arc<dyn Normalizer>> {
        let config = NormalizerConfig {
            lexicon_path: Some(path.into()),
            ..Default::default()
        };
        Self::create(NormalizerProvider::Lexicon, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_lexicon_from_provider_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cats\tcat\t12").unwrap();

        let config = NormalizerProviderConfig {
            provider: NormalizerProvider::Lexicon,
            config: NormalizerConfig {
                lexicon_path: Some(file.path().to_path_buf()),
                ..Default::default()
            },
        };
        let normalizer = NormalizerFactory::from_config(&config).unwrap();
        assert_eq!(normalizer.provider_name(), "lexicon");
        assert_eq!(
            normalizer.normalize("cats").await.unwrap().unwrap().canonical,
            "cat"
        );
    }

    #[test]
    fn test_oxford_with_explicit_credentials() {
        let config = NormalizerConfig {
            app_id: Some("id".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let normalizer = NormalizerFactory::create(NormalizerProvider::Oxford, config).unwrap();
        assert_eq!(normalizer.provider_name(), "oxford");
    }
}
