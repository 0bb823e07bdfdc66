//! Advice Slip connector.
//!
//! `GET /advice` answers `{"slip": {"id": 117, "advice": "..."}}`.

use crate::sources::http::JsonFetcher;
use async_trait::async_trait;
use etl_core::{AdviceSlip, Extractor};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct AdviceEnvelope {
    #[serde(default)]
    slip: Option<AdviceSlip>,
}

#[derive(Clone)]
pub struct AdviceExtractor {
    fetcher: JsonFetcher,
    url: String,
}

impl AdviceExtractor {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Extractor for AdviceExtractor {
    type Raw = AdviceSlip;

    fn id(&self) -> &'static str {
        "advice"
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Option<AdviceSlip> {
        let envelope: AdviceEnvelope = self.fetcher.get_json(&self.url).await?;
        if envelope.slip.is_none() {
            tracing::warn!(url = %self.url, "advice response has no slip");
        }
        envelope.slip
    }
}
