use async_trait::async_trait;

/// Pulls one raw payload from an external source.
///
/// Implementations live in `etl_integrations` (HTTP) or in tests. `fetch` never
/// returns an error: transport, status and decoding failures are logged by the
/// implementation and reported as `None` ("no data this cycle").
#[async_trait]
pub trait Extractor: Send + Sync {
    type Raw: Send;

    /// Stable identifier used in logs.
    fn id(&self) -> &'static str;

    async fn fetch(&self) -> Option<Self::Raw>;
}
