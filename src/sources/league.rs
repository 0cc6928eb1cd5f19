// Source C: one flat table, identity headers renamed to the shared key names.

use tracing::{instrument, warn};

use super::normaliser::{table_from_grid, GridSpec};
use super::types::LeagueExtract;
use crate::config::LeagueLayout;
use crate::table::{Cell, Table};

#[instrument(skip_all, fields(rows = extract.rows.len()))]
pub fn normalize(extract: &LeagueExtract, layout: &LeagueLayout) -> Table {
    let headers = if extract.headers.is_empty() { &layout.default_headers } else { &extract.headers };
    let spec = GridSpec {
        player_column: &layout.player_column,
        club_column: &layout.club_column,
        rank_column: None,
        min_cells: 2,
        cell: Cell::text,
    };
    table_from_grid(headers, &extract.rows, &spec).unwrap_or_else(|| {
        warn!("League table lacks player/team headers");
        Table::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CLUB_NAME, PLAYER_NAME};

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn test_fixed_layout_when_headers_absent() {
        let extract = LeagueExtract {
            headers: vec![],
            rows: strings(&[
                &["Cole Palmer", "Chelsea", "34", "22", "20.18", "11", "11.23", "101", "71", "9", "0"],
                &["Total"],
            ]),
        };
        let table = normalize(&extract, &LeagueLayout::default());

        assert_eq!(table.len(), 1);
        assert_eq!(&table.columns()[..4], &[PLAYER_NAME, CLUB_NAME, "Games", "Goals"]);
        let palmer = table.find("Cole Palmer", "Chelsea").unwrap();
        assert_eq!(palmer.get("xG"), &Cell::from("20.18"));
        assert_eq!(palmer.get("Red Cards"), &Cell::from("0"));
    }

    #[test]
    fn test_explicit_headers() {
        let extract = LeagueExtract {
            headers: vec!["Team".into(), "Player".into(), "xA".into()],
            rows: strings(&[&["Arsenal", "Martin Odegaard", "8.1"]]),
        };
        let table = normalize(&extract, &LeagueLayout::default());
        assert_eq!(table.columns(), &[PLAYER_NAME, CLUB_NAME, "xA"]);
        assert!(table.find("Martin Odegaard", "Arsenal").is_some());
    }

    #[test]
    fn test_wrong_headers_is_empty() {
        let extract = LeagueExtract {
            headers: vec!["Name".into(), "Club".into()],
            rows: strings(&[&["A", "B"]]),
        };
        assert!(normalize(&extract, &LeagueLayout::default()).is_empty());
    }
}
