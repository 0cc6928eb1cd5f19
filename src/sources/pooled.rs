// Fetcher that scrapes through a pooled automation session.

use std::sync::Arc;

use tracing::{instrument, warn};

use super::{RawExtract, SourceError, SourceFetcher};
use crate::session::{SessionFactory, SessionPool};

/// Page-specific scraping against one checked-out session.
#[async_trait::async_trait]
pub trait SessionScraper<S: Send>: Send + Sync {
    async fn scrape(&self, session: &mut S) -> Result<RawExtract, SourceError>;
}

pub struct PooledFetcher<F: SessionFactory, X> {
    pool: Arc<SessionPool<F>>,
    scraper: X,
}

impl<F: SessionFactory, X> PooledFetcher<F, X> {
    pub fn new(pool: Arc<SessionPool<F>>, scraper: X) -> Self {
        Self { pool, scraper }
    }
}

#[async_trait::async_trait]
impl<F, X> SourceFetcher for PooledFetcher<F, X>
where
    F: SessionFactory,
    X: SessionScraper<F::Session>,
{
    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<RawExtract, SourceError> {
        let mut session = self.pool.checkout().await?;
        let result = self.scraper.scrape(&mut session).await;
        if let Err(e) = &result {
            warn!(error = %e, "Scrape failed, discarding session");
            session.discard();
        }
        result
    }
}
