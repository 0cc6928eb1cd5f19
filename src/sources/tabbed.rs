// Source B: one grid per tab; only the canonical summary tab is kept.

use tracing::{instrument, warn};

use super::normaliser::{table_from_grid, GridSpec};
use super::types::TabbedExtract;
use crate::config::TabbedLayout;
use crate::table::{Cell, Table};

#[instrument(skip_all, fields(tabs = extract.tabs.len()))]
pub fn normalize(extract: &TabbedExtract, layout: &TabbedLayout) -> Table {
    let canonical = layout.canonical_tab.trim();
    let Some(tab) = extract.tabs.iter().find(|t| t.name.trim() == canonical) else {
        warn!(tab = canonical, "Canonical tab missing");
        return Table::new();
    };

    let spec = GridSpec {
        player_column: &layout.player_column,
        club_column: &layout.club_column,
        rank_column: None,
        min_cells: 0,
        cell: Cell::text,
    };
    table_from_grid(&tab.headers, &tab.rows, &spec).unwrap_or_else(|| {
        warn!(tab = canonical, "Canonical tab lacks player/team headers");
        Table::new()
    })
}
