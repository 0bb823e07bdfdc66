//! ZenQuotes connector.
//!
//! `GET /api/random` answers a one-element list `[{"q": "...", "a": "...", "h": "..."}]`.
//! The list is handed over untouched; the transformer picks the first entry.

use crate::sources::http::JsonFetcher;
use async_trait::async_trait;
use etl_core::{Extractor, QuoteEntry, RawActivity};
use tracing::instrument;

#[derive(Clone)]
pub struct QuoteExtractor {
    fetcher: JsonFetcher,
    url: String,
}

impl QuoteExtractor {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Extractor for QuoteExtractor {
    type Raw = RawActivity;

    fn id(&self) -> &'static str {
        "quotes"
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Option<RawActivity> {
        let entries: Vec<QuoteEntry> = self.fetcher.get_json(&self.url).await?;
        Some(RawActivity::Quotes(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{closed_port_url, serve_once};
    use std::time::Duration;

    fn extractor(url: String) -> QuoteExtractor {
        QuoteExtractor::new(JsonFetcher::new(Duration::from_secs(2)).unwrap(), url)
    }

    #[tokio::test]
    async fn returns_quote_list() {
        let url = serve_once(
            200,
            r#"[{"q": "Test quote content", "a": "Test Author", "h": "<blockquote/>"}]"#,
        )
        .await;
        let Some(RawActivity::Quotes(entries)) = extractor(url).fetch().await else {
            panic!("expected quotes");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].q.as_deref(), Some("Test quote content"));
    }

    #[tokio::test]
    async fn object_instead_of_list_is_none() {
        let url = serve_once(200, r#"{"q": "not a list"}"#).await;
        assert!(extractor(url).fetch().await.is_none());
    }

    #[tokio::test]
    async fn rate_limited_is_none() {
        let url = serve_once(429, r#"[]"#).await;
        assert!(extractor(url).fetch().await.is_none());
    }

    #[tokio::test]
    async fn transport_error_is_none() {
        assert!(extractor(closed_port_url().await).fetch().await.is_none());
    }
}
