// Per-source normalizers and the fetcher seam they are fed through
pub mod types;       // raw extract shapes, one per source
pub mod normaliser;  // grid -> Table helpers shared by the sources
pub mod standings;   // Source A: wide per-category tables
pub mod tabbed;      // Source B: tabbed summary tables
pub mod league;      // Source C: single flat league table
pub mod file;        // JSON-on-disk fetcher
pub mod pooled;      // fetcher backed by a scoped automation session

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::config::SourceLayouts;
use crate::table::Table;

pub use file::FileFetcher;
pub use pooled::{PooledFetcher, SessionScraper};
pub use types::{Category, CategoryTable, LeagueExtract, RawExtract, StandingsExtract, Tab, TabbedExtract};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Standings, // Source A
    Tabbed,    // Source B
    League,    // Source C
}

impl SourceId {
    pub const ALL: [SourceId; 3] = [SourceId::Standings, SourceId::Tabbed, SourceId::League];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Standings => "standings",
            SourceId::Tabbed => "tabbed",
            SourceId::League => "league",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fetcher could not hand over an extract. Never fatal: the source
/// simply contributes an empty table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("malformed extract in {path}: {error}")]
    Malformed {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
    #[error("automation session failed: {0}")]
    Session(String),
}

/// Obtains one source's raw extract. Network/browser work lives behind this.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<RawExtract, SourceError>;
}

/// Normalizer with configurable page layouts.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    layouts: SourceLayouts,
}

impl Normalizer {
    pub fn new(layouts: SourceLayouts) -> Self {
        Self { layouts }
    }

    /// Absent, empty or mismatched extracts produce an empty table.
    pub fn normalize(&self, source: SourceId, raw: Option<&RawExtract>) -> Table {
        match (source, raw) {
            (_, None) => {
                warn!(source = %source, "No extract for source");
                Table::new()
            }
            (SourceId::Standings, Some(RawExtract::Standings(x))) => standings::normalize(x, &self.layouts.standings),
            (SourceId::Tabbed, Some(RawExtract::Tabbed(x))) => tabbed::normalize(x, &self.layouts.tabbed),
            (SourceId::League, Some(RawExtract::League(x))) => league::normalize(x, &self.layouts.league),
            (_, Some(other)) => {
                warn!(source = %source, got = %other.source(), "Extract belongs to a different source");
                Table::new()
            }
        }
    }
}

/// `Normalizer::default().normalize(..)`.
pub fn normalize(source: SourceId, raw: Option<&RawExtract>) -> Table {
    Normalizer::default().normalize(source, raw)
}
