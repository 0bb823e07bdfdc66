//! HTTP extractors implementing `etl_core::Extractor`.

pub mod sources;

pub use sources::advice::AdviceExtractor;
pub use sources::bored::BoredActivityExtractor;
pub use sources::dog::DogImageExtractor;
pub use sources::http::JsonFetcher;
pub use sources::quotes::QuoteExtractor;
