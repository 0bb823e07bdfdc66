//! One extractor per public API. All of them share a `JsonFetcher`, which maps
//! every transport, status and decoding failure to `None`.

pub mod advice;
pub mod bored;
pub mod dog;
pub mod http;
pub mod quotes;

#[cfg(test)]
pub(crate) mod test_support;
