//! wordbank-dictionary - Dictionary provider implementations for wordbank.
//!
//! Providers map a raw submitted word to its canonical form and corpus
//! frequency through the [`Normalizer`] trait.
//!
//! # Supported Providers
//!
//! - **Oxford** - Oxford Dictionaries API (inflections and NMC frequency)
//! - **Lexicon** - Offline tab-separated lexicon file
//!
//! # Example
//!
//! ```ignore
//! use wordbank_dictionary::NormalizerFactory;
//!
//! // Oxford credentials from OXFORD_APP_ID / OXFORD_APP_KEY
//! let normalizer = NormalizerFactory::oxford()?;
//!
//! // Or an offline lexicon
//! let normalizer = NormalizerFactory::lexicon("lexicon.tsv")?;
//! ```

mod factory;
mod lexicon;
mod oxford;

pub use factory::NormalizerFactory;
pub use lexicon::LexiconNormalizer;
pub use oxford::OxfordDictionary;

// Re-export core types for convenience
pub use wordbank_core::config::{NormalizerProvider, NormalizerProviderConfig};
pub use wordbank_core::traits::{Lookup, Normalizer, NormalizerConfig};
