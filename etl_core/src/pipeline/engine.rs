use crate::extract::Extractor;
use crate::models::{AdviceSlip, DogImage, RawActivity, SourceKind};
use crate::pipeline::models::{RunSummary, SourceOutcome};
use crate::store::{Store, Upsert};
use crate::transform::{transform_activity, transform_advice, transform_dog_image};
use crate::Result;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Batch orchestrator: extract → transform → upsert, one source at a time.
///
/// Extraction and validation failures only skip the affected source for the
/// current iteration. A store error aborts the whole run; rows written before
/// the failure stay committed.
pub struct PipelineEngine {
    advice: Arc<dyn Extractor<Raw = AdviceSlip>>,
    activity: Arc<dyn Extractor<Raw = RawActivity>>,
    dog_image: Arc<dyn Extractor<Raw = DogImage>>,
    store: Arc<dyn Store>,
}

impl PipelineEngine {
    pub fn new(
        advice: Arc<dyn Extractor<Raw = AdviceSlip>>,
        activity: Arc<dyn Extractor<Raw = RawActivity>>,
        dog_image: Arc<dyn Extractor<Raw = DogImage>>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            advice,
            activity,
            dog_image,
            store,
        }
    }

    /// Run `batch_size` iterations. Returns `false` if any store write failed.
    #[tracing::instrument(level = "info", name = "pipeline.run", skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self, batch_size: NonZeroU32) -> bool {
        match self.run_batch(batch_size).await {
            Ok(summary) => {
                log_summary(&summary);
                true
            }
            Err(e) => {
                tracing::error!(error = ?e, "pipeline error");
                false
            }
        }
    }

    /// Like `run`, but hands back the per-source tally or the aborting error.
    pub async fn run_batch(&self, batch_size: NonZeroU32) -> Result<RunSummary> {
        let mut summary = RunSummary::new(batch_size.get());
        tracing::Span::current().record("run_id", tracing::field::display(summary.run_id));

        for iteration in 1..=batch_size.get() {
            tracing::debug!(iteration, batch_size = batch_size.get(), "starting iteration");

            let outcome = self
                .process(SourceKind::Advice, self.advice.as_ref(), transform_advice)
                .await?;
            summary.record(SourceKind::Advice, outcome);

            let outcome = self
                .process(SourceKind::Activity, self.activity.as_ref(), transform_activity)
                .await?;
            summary.record(SourceKind::Activity, outcome);

            let outcome = self
                .process(SourceKind::DogImage, self.dog_image.as_ref(), transform_dog_image)
                .await?;
            summary.record(SourceKind::DogImage, outcome);
        }

        summary.finish();
        Ok(summary)
    }

    async fn process<R, T>(
        &self,
        kind: SourceKind,
        extractor: &dyn Extractor<Raw = R>,
        transform: fn(&R) -> Option<T>,
    ) -> Result<SourceOutcome>
    where
        R: Send,
        T: Upsert,
    {
        let Some(raw) = extractor.fetch().await else {
            tracing::warn!(source = %kind, extractor = extractor.id(), "no data extracted");
            return Ok(SourceOutcome::Skipped);
        };

        let Some(record) = transform(&raw) else {
            tracing::warn!(source = %kind, extractor = extractor.id(), "payload failed validation");
            return Ok(SourceOutcome::Skipped);
        };

        let stmt = record.upsert();
        let rows = self
            .store
            .execute(stmt.sql, &stmt.params)
            .await
            .inspect_err(|e| {
                tracing::error!(source = %kind, table = record.table(), error = %e, "upsert failed");
            })?;

        if rows == 0 {
            tracing::debug!(source = %kind, table = record.table(), "natural key already present");
            Ok(SourceOutcome::Duplicate)
        } else {
            tracing::debug!(source = %kind, table = record.table(), rows, "record stored");
            Ok(SourceOutcome::Inserted)
        }
    }
}

fn log_summary(summary: &RunSummary) {
    for (kind, stats) in &summary.sources {
        tracing::info!(
            source = %kind,
            inserted = stats.inserted,
            duplicates = stats.duplicates,
            skipped = stats.skipped,
            "source summary"
        );
    }
    tracing::info!(
        inserted = summary.inserted(),
        duplicates = summary.duplicates(),
        skipped = summary.skipped(),
        "pipeline run completed"
    );
}
