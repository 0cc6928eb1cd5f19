// Settings layered from an optional footstats.toml and FOOTSTATS__* env vars.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Page-structure knobs for the three normalizers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceLayouts {
    pub standings: StandingsLayout,
    pub tabbed: TabbedLayout,
    pub league: LeagueLayout,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StandingsLayout {
    pub player_column: String,
    pub club_column: String,
    /// Rows whose rank cell isn't all digits are totals/header repeats.
    pub rank_column: String,
    /// Joins multi-level header cells, e.g. "Performance" + "Gls".
    pub header_separator: String,
}

impl Default for StandingsLayout {
    fn default() -> Self {
        Self {
            player_column: "Player".into(),
            club_column: "Squad".into(),
            rank_column: "Rk".into(),
            header_separator: " ".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabbedLayout {
    pub canonical_tab: String,
    pub player_column: String,
    pub club_column: String,
}

impl Default for TabbedLayout {
    fn default() -> Self {
        Self {
            canonical_tab: "Summary".into(),
            player_column: "Player".into(),
            club_column: "Team".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LeagueLayout {
    pub player_column: String,
    pub club_column: String,
    /// Used when the extract carries no header row.
    pub default_headers: Vec<String>,
}

impl Default for LeagueLayout {
    fn default() -> Self {
        let default_headers = [
            "Player", "Team", "Games", "Goals", "xG", "Assists", "xA",
            "Shots", "Key Passes", "Yellow Cards", "Red Cards",
        ];
        Self {
            player_column: "Player".into(),
            club_column: "Team".into(),
            default_headers: default_headers.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// Where the binary finds each source's JSON extract.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub standings: Option<PathBuf>,
    pub tabbed: Option<PathBuf>,
    pub league: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_filter: String,
    pub layouts: SourceLayouts,
    pub inputs: InputPaths,
    pub output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            layouts: SourceLayouts::default(),
            inputs: InputPaths::default(),
            output: None,
        }
    }
}

impl Settings {
    /// Explicit file (required) or ./footstats.toml (optional), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("footstats").required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("FOOTSTATS").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.layouts.standings.rank_column, "Rk");
        assert_eq!(s.layouts.tabbed.canonical_tab, "Summary");
        assert_eq!(s.layouts.league.default_headers.len(), 11);
        assert!(s.output.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "log_filter = \"debug\"\n[layouts.tabbed]\ncanonical_tab = \"Overview\"\n[inputs]\nleague = \"league.json\""
        )
        .unwrap();

        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(s.log_filter, "debug");
        assert_eq!(s.layouts.tabbed.canonical_tab, "Overview");
        assert_eq!(s.layouts.tabbed.club_column, "Team");
        assert_eq!(s.inputs.league, Some(PathBuf::from("league.json")));
        assert_eq!(s.layouts.standings, StandingsLayout::default());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/footstats.toml"))).is_err());
    }
}
