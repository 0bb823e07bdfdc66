//! Wiring from configuration to a ready `PipelineEngine`.

use crate::cli::{Commands, RunArgs};
use etl_core::config::ActivitySource;
use etl_core::o11y::LogConfig;
use etl_core::{EtlConfig, Extractor, PgStore, PipelineEngine, RawActivity, Store};
use etl_integrations::{
    AdviceExtractor, BoredActivityExtractor, DogImageExtractor, JsonFetcher, QuoteExtractor,
};
use std::sync::Arc;

/// Logging settings for `cmd`: `--log-level` overrides `LOG_LEVEL`, and only
/// `run` writes a log file.
pub fn log_config(
    cmd: &Commands,
    lookup: impl Fn(&str) -> Option<String>,
) -> etl_core::Result<LogConfig> {
    let level = match cmd {
        Commands::Run(RunArgs { log_level, .. }) => log_level.as_deref(),
        _ => None,
    };
    let mut cfg = LogConfig::from_lookup_with_level(lookup, level)?;
    if !matches!(cmd, Commands::Run(_)) {
        cfg.dir = None;
    }
    Ok(cfg)
}

pub fn build_engine(cfg: &EtlConfig, store: Arc<dyn Store>) -> etl_core::Result<PipelineEngine> {
    let sources = &cfg.sources;
    let fetcher = JsonFetcher::new(sources.request_timeout)?;

    let activity: Arc<dyn Extractor<Raw = RawActivity>> = match sources.activity_source {
        ActivitySource::Quotes => Arc::new(QuoteExtractor::new(fetcher.clone(), sources.quote_url.clone())),
        ActivitySource::Bored => Arc::new(BoredActivityExtractor::new(
            fetcher.clone(),
            sources.bored_url.clone(),
        )),
    };
    tracing::debug!(activity = activity.id(), "activity source selected");

    Ok(PipelineEngine::new(
        Arc::new(AdviceExtractor::new(fetcher.clone(), sources.advice_url.clone())),
        activity,
        Arc::new(DogImageExtractor::new(fetcher, sources.dog_url.clone())),
        store,
    ))
}

pub fn build_store(cfg: &EtlConfig) -> Arc<dyn Store> {
    Arc::new(PgStore::from_config(&cfg.database))
}

/// Effective configuration as JSON; the password is never serialized.
pub fn config_json(cfg: &EtlConfig) -> serde_json::Value {
    serde_json::json!({
        "database": cfg.database,
        "connection": cfg.database.redacted_connection_string(),
        "sources": cfg.sources,
    })
}
