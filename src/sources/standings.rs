// Source A: one wide table per stat category, merged on identity key.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use super::normaliser::{flatten_header, table_from_grid, GridSpec};
use super::types::{Category, CategoryTable, StandingsExtract};
use crate::config::StandingsLayout;
use crate::table::{merge_with, Cell, ExactMatch, Table};

#[instrument(skip_all, fields(tables = extract.tables.len()))]
pub fn normalize(extract: &StandingsExtract, layout: &StandingsLayout) -> Table {
    // Fixed category order; a category listed twice keeps its first table
    let mut by_category: BTreeMap<Category, &CategoryTable> = BTreeMap::new();
    for t in &extract.tables {
        if by_category.contains_key(&t.category) {
            warn!(category = %t.category, "Category table listed twice, keeping first");
            continue;
        }
        by_category.insert(t.category, t);
    }

    let Some(standard) = by_category.get(&Category::Standard).map(|t| category_table(t, layout)) else {
        warn!("Standard stats table missing");
        return Table::new();
    };
    if standard.is_empty() {
        warn!("Standard stats table has no player rows");
        return Table::new();
    }

    let others = by_category
        .iter()
        .filter(|(c, _)| **c != Category::Standard)
        .map(|(c, t)| (c.as_str(), category_table(t, layout)));

    match merge_with(&ExactMatch, std::iter::once((Category::Standard.as_str(), standard)).chain(others)) {
        Ok(merged) => merged.into_table(),
        // Normalised rows always carry identity, so this only guards the invariant
        Err(e) => {
            warn!(error = %e, "Could not merge category tables");
            Table::new()
        }
    }
}

fn category_table(t: &CategoryTable, layout: &StandingsLayout) -> Table {
    let headers: Vec<String> = t.headers.iter().map(|levels| flatten_header(levels, &layout.header_separator)).collect();
    let spec = GridSpec {
        player_column: &layout.player_column,
        club_column: &layout.club_column,
        rank_column: Some(&layout.rank_column),
        min_cells: 0,
        cell: Cell::inferred,
    };
    match table_from_grid(&headers, &t.rows, &spec) {
        Some(table) => {
            debug!(category = %t.category, rows = table.len(), "Category table normalised");
            table
        }
        None => {
            warn!(category = %t.category, "Category table lacks identity headers");
            Table::new()
        }
    }
}
