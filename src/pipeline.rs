// Orchestrates fetch -> normalize (per source, concurrently) -> merge -> derive.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::config::SourceLayouts;
use crate::derived::Calculator;
use crate::sources::{Normalizer, SourceFetcher, SourceId};
use crate::table::{merge_with, ExactMatch, KeyMatcher, MergeError, MergedTable, Table};

/// The only failure a run surfaces. No partial output accompanies it.
#[derive(Debug, Error)]
#[error("pipeline failed: {cause}")]
pub struct PipelineFailed {
    #[from]
    pub cause: MergeError,
}

/// One fetcher per source.
#[derive(Clone)]
pub struct SourceFetchers {
    pub standings: Arc<dyn SourceFetcher>,
    pub tabbed: Arc<dyn SourceFetcher>,
    pub league: Arc<dyn SourceFetcher>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: MergedTable,
    pub row_count: usize,
}

pub struct Pipeline {
    normalizer: Arc<Normalizer>,
    matcher: Box<dyn KeyMatcher>,
    calculator: Calculator,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(SourceLayouts::default(), Box::new(ExactMatch), Calculator::default())
    }
}

impl Pipeline {
    pub fn new(layouts: SourceLayouts, matcher: Box<dyn KeyMatcher>, calculator: Calculator) -> Self {
        Self { normalizer: Arc::new(Normalizer::new(layouts)), matcher, calculator }
    }

    #[instrument(skip_all)]
    pub async fn run(&self, fetchers: SourceFetchers) -> Result<PipelineOutput, PipelineFailed> {
        let start = Instant::now();
        metrics::counter!("footstats_pipeline_runs_total").increment(1);
        info!("Starting pipeline run");

        // Independent tasks, joined before the merge
        let standings = self.spawn_source(SourceId::Standings, fetchers.standings);
        let tabbed = self.spawn_source(SourceId::Tabbed, fetchers.tabbed);
        let league = self.spawn_source(SourceId::League, fetchers.league);
        let (standings, tabbed, league) = tokio::join!(
            settle(SourceId::Standings, standings),
            settle(SourceId::Tabbed, tabbed),
            settle(SourceId::League, league),
        );

        let merged = merge_with(
            self.matcher.as_ref(),
            [
                (SourceId::Standings.as_str(), standings),
                (SourceId::Tabbed.as_str(), tabbed),
                (SourceId::League.as_str(), league),
            ],
        )
        .map_err(|e| {
            error!(error = %e, "Merge failed");
            metrics::counter!("footstats_pipeline_failures_total").increment(1);
            PipelineFailed::from(e)
        })?;

        let table = self.calculator.derive(&merged);
        let row_count = table.len();

        metrics::gauge!("footstats_merged_rows").set(row_count as f64);
        metrics::histogram!("footstats_pipeline_seconds").record(start.elapsed().as_secs_f64());
        info!(rows = row_count, columns = table.columns().len(), elapsed_ms = start.elapsed().as_millis() as u64, "Pipeline run finished");

        Ok(PipelineOutput { table, row_count })
    }

    fn spawn_source(&self, source: SourceId, fetcher: Arc<dyn SourceFetcher>) -> JoinHandle<Table> {
        let normalizer = Arc::clone(&self.normalizer);
        tokio::spawn(async move {
            let raw = match fetcher.fetch().await {
                Ok(raw) => Some(raw),
                Err(e) => {
                    warn!(source = %source, error = %e, "Source unavailable");
                    None
                }
            };
            normalizer.normalize(source, raw.as_ref())
        })
    }
}

// A panicked source task contributes nothing, same as an unavailable source
async fn settle(source: SourceId, handle: JoinHandle<Table>) -> Table {
    let table = match handle.await {
        Ok(table) => table,
        Err(e) => {
            error!(source = %source, error = %e, "Source task failed");
            Table::new()
        }
    };
    if table.is_empty() {
        metrics::counter!("footstats_source_empty_total", "source" => source.as_str()).increment(1);
    }
    metrics::gauge!("footstats_source_rows", "source" => source.as_str()).set(table.len() as f64);
    info!(source = %source, rows = table.len(), "Source normalised");
    table
}

/// `Pipeline::default().run(fetchers)`.
pub async fn run_pipeline(fetchers: SourceFetchers) -> Result<PipelineOutput, PipelineFailed> {
    Pipeline::default().run(fetchers).await
}
