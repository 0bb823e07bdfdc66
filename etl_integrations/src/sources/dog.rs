//! Dog CEO connector.
//!
//! `GET /api/breeds/image/random` answers `{"message": "<image url>", "status": "success"}`.
//! The URL is only trusted when `status` is `success`.

use crate::sources::http::JsonFetcher;
use async_trait::async_trait;
use etl_core::{DogImage, Extractor};
use serde::Deserialize;
use tracing::instrument;

const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct DogApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct DogImageExtractor {
    fetcher: JsonFetcher,
    url: String,
}

impl DogImageExtractor {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Extractor for DogImageExtractor {
    type Raw = DogImage;

    fn id(&self) -> &'static str {
        "dog_image"
    }

    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Option<DogImage> {
        let resp: DogApiResponse = self.fetcher.get_json(&self.url).await?;
        if resp.status.as_deref() != Some(STATUS_SUCCESS) {
            tracing::warn!(url = %self.url, status = ?resp.status, "dog api did not report success");
            return None;
        }
        Some(DogImage {
            image_url: resp.message,
        })
    }
}
