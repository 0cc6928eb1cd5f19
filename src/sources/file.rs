// Reads a previously captured extract from disk.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{RawExtract, SourceError, SourceFetcher, SourceId};

/// JSON file holding one source's extract (`StandingsExtract`, `TabbedExtract` or
/// `LeagueExtract` shape, picked by `source`). A `None` path means not configured.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    source: SourceId,
    path: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new(source: SourceId, path: Option<PathBuf>) -> Self {
        Self { source, path }
    }

    fn parse<T: DeserializeOwned>(&self, path: &PathBuf, bytes: &[u8]) -> Result<T, SourceError> {
        serde_json::from_slice(bytes).map_err(|error| SourceError::Malformed { path: path.clone(), error })
    }
}

#[async_trait::async_trait]
impl SourceFetcher for FileFetcher {
    #[instrument(skip(self), fields(source = %self.source))]
    async fn fetch(&self) -> Result<RawExtract, SourceError> {
        let Some(path) = &self.path else {
            return Err(SourceError::Unavailable(format!("no input file configured for {}", self.source)));
        };
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|error| SourceError::Io { path: path.clone(), error })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read extract");

        Ok(match self.source {
            SourceId::Standings => RawExtract::Standings(self.parse(path, &bytes)?),
            SourceId::Tabbed => RawExtract::Tabbed(self.parse(path, &bytes)?),
            SourceId::League => RawExtract::League(self.parse(path, &bytes)?),
        })
    }
}
