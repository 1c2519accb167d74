//! Core traits for wordbank providers.

mod normalizer;

pub use normalizer::*;
