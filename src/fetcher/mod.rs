pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Network boundary: one bounded-timeout retrieval of a feed document.
///
/// No retries here; retry policy belongs to the poll scheduler, which
/// simply tries the source again on the next cycle.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
