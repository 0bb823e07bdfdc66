//! Bored API connector.
//!
//! `GET /api/activity` answers
//! `{"activity": "...", "type": "...", "participants": 1, "price": 0.1, "key": "5881028", "accessibility": 0.3}`.

use crate::sources::http::JsonFetcher;
use async_trait::async_trait;
use etl_core::{BoredActivity, Extractor, RawActivity};
use tracing::instrument;

#[derive(Clone)]
pub struct BoredActivityExtractor {
    fetcher: JsonFetcher,
    url: String,
}

impl BoredActivityExtractor {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Extractor for BoredActivityExtractor {
    type Raw = RawActivity;

    fn id(&self) -> &'static str {
        "bored"
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Option<RawActivity> {
        let activity: BoredActivity = self.fetcher.get_json(&self.url).await?;
        Some(RawActivity::Bored(activity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::serve_once;
    use std::time::Duration;

    #[tokio::test]
    async fn parses_activity() {
        let url = serve_once(
            200,
            r#"{"activity": "Learn Express.js", "type": "education", "participants": 1, "price": 0.1, "key": "3943506", "accessibility": 0.25}"#,
        )
        .await;
        let ext = BoredActivityExtractor::new(JsonFetcher::new(Duration::from_secs(2)).unwrap(), url);
        let Some(RawActivity::Bored(a)) = ext.fetch().await else {
            panic!("expected bored activity");
        };
        assert_eq!(a.key.as_deref(), Some("3943506"));
        assert_eq!(a.kind.as_deref(), Some("education"));
        assert_eq!(a.accessibility, Some(0.25));
    }
}
