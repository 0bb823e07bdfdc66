pub mod engine;
pub mod models;

pub use engine::PipelineEngine;
pub use models::{RunSummary, SourceOutcome, SourceStats};
