use etl_core::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

/// GET-and-decode helper shared by all extractors.
#[derive(Clone)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::backend("build http client", e))?;
        Ok(Self { client })
    }

    /// Decoded body, or `None` after logging why it could not be obtained.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        match self.try_get_json(url).await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!(url, error = ?e, "error fetching from source");
                None
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::backend_reqwest)?
            .error_for_status()
            .map_err(Error::backend_reqwest)?;
        resp.json::<T>().await.map_err(Error::backend_reqwest)
    }
}
