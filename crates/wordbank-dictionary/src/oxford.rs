//! Oxford Dictionaries API provider.
//!
//! A raw word is resolved in two calls: the inflections endpoint gives the
//! root form, then the frequency endpoint gives its normalized corpus
//! frequency in the NMC corpus.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use wordbank_core::error::{ErrorCode, WordbankError, WordbankResult};
use wordbank_core::traits::{Lookup, Normalizer, NormalizerConfig};

const OXFORD_API_URL: &str = "https://od-api.oxforddictionaries.com:443/api/v1/";
const FREQUENCY_CORPUS: &str = "nmc";

/// Oxford Dictionaries normalizer.
pub struct OxfordDictionary {
    client: Client,
    app_id: String,
    app_key: SecretString,
    base_url: Url,
    language: String,
    max_retries: usize,
}

#[derive(Debug, Deserialize)]
struct InflectionsResponse {
    #[serde(default)]
    results: Vec<HeadwordEntry>,
}

#[derive(Debug, Deserialize)]
struct HeadwordEntry {
    #[serde(rename = "lexicalEntries", default)]
    lexical_entries: Vec<LexicalEntry>,
}

#[derive(Debug, Deserialize)]
struct LexicalEntry {
    #[serde(rename = "inflectionOf", default)]
    inflection_of: Vec<Inflection>,
}

#[derive(Debug, Deserialize)]
struct Inflection {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FrequencyResponse {
    result: Option<FrequencyResult>,
}

#[derive(Debug, Deserialize)]
struct FrequencyResult {
    #[serde(rename = "normalizedFrequency")]
    normalized_frequency: Option<f64>,
}

/// Root form from an inflections response body.
fn parse_root_form(body: &str) -> WordbankResult<Option<String>> {
    let response: InflectionsResponse = serde_json::from_str(body)
        .map_err(|e| WordbankError::parse(format!("Invalid inflections response: {}", e)))?;

    Ok(response
        .results
        .into_iter()
        .next()
        .and_then(|entry| entry.lexical_entries.into_iter().next())
        .and_then(|lexical| lexical.inflection_of.into_iter().next())
        .map(|inflection| inflection.id)
        .filter(|id| !id.is_empty()))
}

/// Frequency from a frequency response body. Zero counts as unknown.
fn parse_frequency(body: &str) -> WordbankResult<Option<f64>> {
    let response: FrequencyResponse = serde_json::from_str(body)
        .map_err(|e| WordbankError::parse(format!("Invalid frequency response: {}", e)))?;

    Ok(response
        .result
        .and_then(|result| result.normalized_frequency)
        .filter(|frequency| *frequency > 0.0))
}

impl OxfordDictionary {
    /// Create a new Oxford provider.
    ///
    /// Credentials come from the config or from `OXFORD_APP_ID` and
    /// `OXFORD_APP_KEY`.
    pub fn new(config: NormalizerConfig) -> WordbankResult<Self> {
        let app_id = config
            .app_id
            .clone()
            .or_else(|| std::env::var("OXFORD_APP_ID").ok())
            .ok_or_else(|| {
                WordbankError::Configuration("Oxford app id not found. Set OXFORD_APP_ID environment variable or provide app_id in config.".to_string())
            })?;
        let app_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OXFORD_APP_KEY").ok())
            .ok_or_else(|| {
                WordbankError::Configuration("Oxford app key not found. Set OXFORD_APP_KEY environment variable or provide api_key in config.".to_string())
            })?;

        let mut base = config
            .base_url
            .clone()
            .unwrap_or_else(|| OXFORD_API_URL.to_string());
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| WordbankError::Configuration(format!("Invalid Oxford base URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WordbankError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            app_id,
            app_key: SecretString::new(app_key),
            base_url,
            language: config.language,
            max_retries: config.max_retries,
        })
    }

    fn inflections_url(&self, word: &str) -> WordbankResult<Url> {
        self.endpoint(&["inflections", &self.language, &word.to_lowercase()])
    }

    fn frequency_url(&self, lemma: &str) -> WordbankResult<Url> {
        let mut url = self.endpoint(&["stats", "frequency", "word", &self.language, ""])?;
        url.query_pairs_mut()
            .append_pair("corpus", FREQUENCY_CORPUS)
            .append_pair("lemma", &lemma.to_lowercase());
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> WordbankResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WordbankError::Configuration("Oxford base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a URL with retries. `Ok(None)` for 404.
    async fn get(&self, url: Url) -> WordbankResult<Option<String>> {
        let fetch = || async {
            let response = self
                .client
                .get(url.clone())
                .header("app_id", &self.app_id)
                .header("app_key", self.app_key.expose_secret().as_str())
                .send()
                .await
                .map_err(network_error)?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let body = response.text().await.map_err(network_error)?;
            if status.is_success() {
                Ok(Some(body))
            } else {
                Err(WordbankError::from_http_status(status.as_u16(), &body))
            }
        };

        fetch
            .retry(
                ExponentialBuilder::default()
                    .with_max_times(self.max_retries)
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_delay(Duration::from_secs(5)),
            )
            .when(WordbankError::is_transient)
            .notify(|err, dur| {
                warn!(url = %url.path(), error = %err, "Oxford request failed, retrying in {:?}", dur);
            })
            .await
    }
}

fn network_error(e: reqwest::Error) -> WordbankError {
    let code = if e.is_timeout() {
        ErrorCode::NetTimeout
    } else {
        ErrorCode::NetConnectionFailed
    };
    WordbankError::Network {
        message: e.to_string(),
        code,
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl Normalizer for OxfordDictionary {
    async fn normalize(&self, raw: &str) -> WordbankResult<Option<Lookup>> {
        let Some(body) = self.get(self.inflections_url(raw)?).await? else {
            debug!(raw, "Oxford has no inflection entry");
            return Ok(None);
        };
        let Some(root) = parse_root_form(&body)? else {
            debug!(raw, "Oxford inflection entry has no root form");
            return Ok(None);
        };

        let Some(body) = self.get(self.frequency_url(&root)?).await? else {
            return Ok(None);
        };
        let frequency = parse_frequency(&body)?;
        debug!(raw, root = %root, ?frequency, "Oxford lookup complete");
        Ok(frequency.map(|frequency| Lookup::new(root, frequency)))
    }

    fn provider_name(&self) -> &str {
        "oxford"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OxfordDictionary {
        OxfordDictionary::new(NormalizerConfig {
            app_id: Some("id".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_root_form() {
        let body = r#"{
            "metadata": {},
            "results": [{
                "id": "running",
                "lexicalEntries": [
                    {"inflectionOf": [{"id": "run", "text": "run"}], "language": "en"},
                    {"inflectionOf": [{"id": "running", "text": "running"}]}
                ]
            }]
        }"#;
        assert_eq!(parse_root_form(body).unwrap(), Some("run".to_string()));
    }

    #[test]
    fn test_parse_root_form_missing_entries() {
        assert_eq!(parse_root_form(r#"{"results": []}"#).unwrap(), None);
        assert_eq!(
            parse_root_form(r#"{"results": [{"lexicalEntries": [{}]}]}"#).unwrap(),
            None
        );
        assert!(parse_root_form("<html>").is_err());
    }

    #[test]
    fn test_parse_frequency() {
        let body = r#"{"metadata": {}, "result": {"frequency": 1820, "lemma": "run", "normalizedFrequency": 42.5}}"#;
        assert_eq!(parse_frequency(body).unwrap(), Some(42.5));
        assert_eq!(
            parse_frequency(r#"{"result": {"normalizedFrequency": 0.4}}"#).unwrap(),
            Some(0.4)
        );
    }

    #[test]
    fn test_zero_or_missing_frequency_is_unknown() {
        assert_eq!(
            parse_frequency(r#"{"result": {"normalizedFrequency": 0}}"#).unwrap(),
            None
        );
        assert_eq!(parse_frequency(r#"{"result": {}}"#).unwrap(), None);
        assert_eq!(parse_frequency(r#"{}"#).unwrap(), None);
    }

    #[test]
    fn test_urls() {
        let oxford = provider();
        assert_eq!(
            oxford.inflections_url("Running").unwrap().as_str(),
            "https://od-api.oxforddictionaries.com/api/v1/inflections/en/running"
        );
        assert_eq!(
            oxford.frequency_url("run").unwrap().as_str(),
            "https://od-api.oxforddictionaries.com/api/v1/stats/frequency/word/en/?corpus=nmc&lemma=run"
        );
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let oxford = provider();
        assert_eq!(
            oxford.inflections_url("a/b c").unwrap().path(),
            "/api/v1/inflections/en/a%2Fb%20c"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let result = OxfordDictionary::new(NormalizerConfig {
            app_id: Some("id".to_string()),
            api_key: None,
            ..Default::default()
        });
        if std::env::var("OXFORD_APP_KEY").is_err() {
            assert!(matches!(result, Err(WordbankError::Configuration(_))));
        }
    }
}
