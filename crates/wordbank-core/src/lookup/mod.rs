//! Memoized dictionary lookups.

mod cache;

pub use cache::LookupCache;
