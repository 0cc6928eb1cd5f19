use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use footstats_rs::config::Settings;
use footstats_rs::derived::Calculator;
use footstats_rs::sources::{FileFetcher, SourceId};
use footstats_rs::table::{ExactMatch, Table};
use footstats_rs::{telemetry, Pipeline, SourceFetchers};
use tracing::info;

/// Merge captured player-stat extracts into one table.
#[derive(Debug, Parser)]
#[command(name = "footstats", version)]
struct Cli {
    /// Settings file (defaults to ./footstats.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Standings-site extract (JSON)
    #[arg(long)]
    standings: Option<PathBuf>,
    /// Tabbed-site extract (JSON)
    #[arg(long)]
    tabbed: Option<PathBuf>,
    /// League-page extract (JSON)
    #[arg(long)]
    league: Option<PathBuf>,
    /// Write the merged table here as CSV
    #[arg(long, short)]
    out: Option<PathBuf>,
    /// Prometheus exporter port (needs the metrics-exporter feature)
    #[arg(long, default_value_t = 9000)]
    metrics_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    telemetry::init_tracing(&settings.log_filter)?;
    telemetry::init_metrics(cli.metrics_port)?;

    // Command line beats configuration
    let standings = cli.standings.or(settings.inputs.standings);
    let tabbed = cli.tabbed.or(settings.inputs.tabbed);
    let league = cli.league.or(settings.inputs.league);
    let out = cli.out.or(settings.output);

    let fetchers = SourceFetchers {
        standings: Arc::new(FileFetcher::new(SourceId::Standings, standings)),
        tabbed: Arc::new(FileFetcher::new(SourceId::Tabbed, tabbed)),
        league: Arc::new(FileFetcher::new(SourceId::League, league)),
    };

    let pipeline = Pipeline::new(settings.layouts, Box::new(ExactMatch), Calculator::default());
    let output = pipeline.run(fetchers).await?;
    info!(players = output.row_count, metrics = output.table.columns().len(), "Reconciled player table");

    if let Some(path) = out {
        write_csv(&output.table, &path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Wrote CSV");
    }
    Ok(())
}

fn write_csv(table: &Table, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(table.columns().iter().map(|c| row.get(c).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
