//! Where canonical datasets come from.
//!
//! The dashboard ships without a backend, so the only production source is
//! [`FixtureSource`], which waits a fixed delay standing in for a network
//! round trip and then yields the bundled JSON.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::error::SourceError;
use crate::fixtures;
use crate::models::DatasetKind;

/// Default artificial acquisition delay.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(600);

/// Asynchronous provider of raw dataset payloads.
pub trait DataSource: Send + Sync {
    /// Fetch the raw JSON array for a dataset class.
    fn fetch(&self, kind: DatasetKind) -> BoxFuture<'static, Result<String, SourceError>>;
}

/// Serves the bundled fixtures after a fixed delay.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    delay: Duration,
}

impl FixtureSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_DELAY)
    }
}

impl DataSource for FixtureSource {
    fn fetch(&self, kind: DatasetKind) -> BoxFuture<'static, Result<String, SourceError>> {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            debug!(dataset = %kind, ?delay, "Fixture dataset served");
            Ok(fixtures::raw(kind).to_string())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_source_serves_bundled_json() {
        let source = FixtureSource::new(Duration::from_millis(1));
        let raw = source.fetch(DatasetKind::SshKeys).await.unwrap();
        assert_eq!(raw, fixtures::raw(DatasetKind::SshKeys));
    }
}
