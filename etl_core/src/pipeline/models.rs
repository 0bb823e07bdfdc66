use crate::models::SourceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// What happened to one source in one iteration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    /// A new row was written.
    Inserted,
    /// The natural key already existed; the upsert was a no-op.
    Duplicate,
    /// Extraction or validation produced nothing.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub inserted: u64,
    pub duplicates: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub batch_size: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sources: BTreeMap<SourceKind, SourceStats>,
}

impl RunSummary {
    pub fn new(batch_size: u32) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            batch_size,
            started_at: Utc::now(),
            completed_at: None,
            sources: SourceKind::ALL
                .into_iter()
                .map(|k| (k, SourceStats::default()))
                .collect(),
        }
    }

    pub fn record(&mut self, kind: SourceKind, outcome: SourceOutcome) {
        let stats = self.sources.entry(kind).or_default();
        match outcome {
            SourceOutcome::Inserted => stats.inserted += 1,
            SourceOutcome::Duplicate => stats.duplicates += 1,
            SourceOutcome::Skipped => stats.skipped += 1,
        }
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn stats(&self, kind: SourceKind) -> SourceStats {
        self.sources.get(&kind).copied().unwrap_or_default()
    }

    pub fn inserted(&self) -> u64 {
        self.sources.values().map(|s| s.inserted).sum()
    }

    pub fn duplicates(&self) -> u64 {
        self.sources.values().map(|s| s.duplicates).sum()
    }

    pub fn skipped(&self) -> u64 {
        self.sources.values().map(|s| s.skipped).sum()
    }
}
