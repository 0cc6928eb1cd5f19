// Grid -> Table conversion shared by all three sources.

use ahash::AHashSet;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::table::{Cell, Row, Table, CLUB_NAME, PLAYER_NAME};

/// How to read one header/row grid.
pub(crate) struct GridSpec<'a> {
    pub player_column: &'a str,
    pub club_column: &'a str,
    /// When set and present, rows whose rank cell isn't all digits are dropped.
    pub rank_column: Option<&'a str>,
    /// Rows with fewer cells than this are skipped outright.
    pub min_cells: usize,
    pub cell: fn(&str) -> Cell,
}

/// "Performance" + "Gls" -> "Performance Gls"; blank levels are skipped.
pub(crate) fn flatten_header(levels: &[String], separator: &str) -> String {
    levels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).join(separator)
}

pub(crate) fn is_rank(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Builds a table keyed on the identity columns. Returns `None` when the grid
/// lacks the player or club header entirely.
pub(crate) fn table_from_grid(headers: &[String], rows: &[Vec<String>], spec: &GridSpec<'_>) -> Option<Table> {
    // First occurrence of each non-blank header wins
    let mut seen = AHashSet::with_capacity(headers.len());
    let mut columns: Vec<(usize, &str)> = Vec::with_capacity(headers.len());
    for (idx, h) in headers.iter().enumerate() {
        let h = h.trim();
        if h.is_empty() {
            continue;
        }
        if !seen.insert(h) {
            warn!(header = h, "Repeated header, keeping first occurrence");
            continue;
        }
        columns.push((idx, h));
    }

    let position = |name: &str| columns.iter().find(|(_, h)| *h == name).map(|(i, _)| *i);
    let player_idx = position(spec.player_column)?;
    let club_idx = position(spec.club_column)?;
    let rank_idx = spec.rank_column.and_then(|r| position(r));

    let data: Vec<(usize, &str)> = columns
        .iter()
        .copied()
        .filter(|(i, _)| *i != player_idx && *i != club_idx)
        .collect();

    let mut table = Table::with_columns([PLAYER_NAME, CLUB_NAME].into_iter().chain(data.iter().map(|(_, h)| *h)));
    let mut skipped = 0usize;

    for raw in rows {
        if raw.len() < spec.min_cells {
            skipped += 1;
            continue;
        }
        if let Some(r) = rank_idx {
            if !raw.get(r).is_some_and(|c| is_rank(c)) {
                skipped += 1;
                continue;
            }
        }
        let player = raw.get(player_idx).map(|s| s.trim()).unwrap_or("");
        let club = raw.get(club_idx).map(|s| s.trim()).unwrap_or("");
        if player.is_empty() || club.is_empty() {
            skipped += 1;
            continue;
        }

        let mut row = Row::with_identity(player, club);
        for &(idx, header) in &data {
            let Some(raw_cell) = raw.get(idx) else { continue };
            let value = if Some(idx) == rank_idx {
                raw_cell.trim().parse::<u64>().map(|n| Cell::Number(n as f64)).unwrap_or(Cell::Null)
            } else {
                (spec.cell)(raw_cell)
            };
            row.set(header, value);
        }
        table.push(row);
    }

    debug!(rows = table.len(), skipped, columns = table.columns().len(), "Normalised grid");
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn spec(rank: Option<&'static str>) -> GridSpec<'static> {
        GridSpec {
            player_column: "Player",
            club_column: "Squad",
            rank_column: rank,
            min_cells: 0,
            cell: Cell::inferred,
        }
    }

    #[test]
    fn test_flatten_header() {
        assert_eq!(flatten_header(&strings(&[" Performance ", "Gls"]), " "), "Performance Gls");
        assert_eq!(flatten_header(&strings(&["", "Player"]), " "), "Player");
        assert_eq!(flatten_header(&strings(&["Per 90", "xG"]), "_"), "Per 90_xG");
    }

    #[test]
    fn test_is_rank() {
        assert!(is_rank("12"));
        assert!(is_rank(" 3 "));
        assert!(!is_rank(""));
        assert!(!is_rank("Rk"));
        assert!(!is_rank("1.5"));
    }

    #[test]
    fn test_rank_filter_and_identity_first() {
        let headers = strings(&["Rk", "Player", "Pos", "Squad", "Gls"]);
        let rows = vec![
            strings(&["1", " Bukayo Saka ", "FW", "Arsenal", "14"]),
            strings(&["Rk", "Player", "Pos", "Squad", "Gls"]),
            strings(&["", "Squad Total", "", "Arsenal", "88"]),
        ];
        let table = table_from_grid(&headers, &rows, &spec(Some("Rk"))).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.columns(), &[PLAYER_NAME, CLUB_NAME, "Rk", "Pos", "Gls"]);
        let row = &table.rows()[0];
        assert_eq!(row.identity(), Some(("Bukayo Saka", "Arsenal")));
        assert_eq!(row.get("Rk"), &Cell::Number(1.0));
        assert_eq!(row.get("Gls"), &Cell::Number(14.0));
    }

    #[test]
    fn test_missing_identity_header() {
        let headers = strings(&["Rk", "Player", "Gls"]);
        assert!(table_from_grid(&headers, &[], &spec(None)).is_none());
    }

    #[test]
    fn test_repeated_header_keeps_first() {
        let headers = strings(&["Player", "Squad", "Gls", "Gls"]);
        let rows = vec![strings(&["A", "X", "3", "0.25"])];
        let table = table_from_grid(&headers, &rows, &spec(None)).unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.rows()[0].get("Gls"), &Cell::Number(3.0));
    }

    #[test]
    fn test_short_rows() {
        let headers = strings(&["Player", "Squad", "Gls", "Ast"]);
        let rows = vec![strings(&["A", "X", "3"]), strings(&["B"])];
        let table = table_from_grid(&headers, &rows, &spec(None)).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.rows()[0].contains("Ast"));
        assert!(table.has_column("Ast"));
    }
}
