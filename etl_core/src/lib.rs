//! Core of the API-to-Postgres batch ETL job: typed payloads and records, pure
//! transformers, the persistence gateway and the batch pipeline engine.

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod o11y;
pub mod pipeline;
pub mod store;
pub mod transform;

pub use config::{ActivitySource, DatabaseConfig, EtlConfig, SourcesConfig};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use models::{
    ActivityRecord, AdviceRecord, AdviceSlip, BoredActivity, DogImage, DogImageRecord, QuoteEntry,
    RawActivity, SourceKind,
};
pub use pipeline::{PipelineEngine, RunSummary, SourceOutcome, SourceStats};
pub use store::{PgStore, SqlParam, Statement, Store, Upsert};
