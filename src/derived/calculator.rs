use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::formula::{self, NOT_AVAILABLE};
use super::placeholders::{UnavailableMetric, UNAVAILABLE_METRICS};
use crate::table::{Cell, MergedTable, Row, Table};

/// One derived column and the columns it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSpec {
    /// numerator / denominator * 100
    Rate { column: &'static str, numerator: &'static str, denominator: &'static str },
    /// lhs - rhs
    Differential { column: &'static str, lhs: &'static str, rhs: &'static str },
    /// won / (won + lost) * 100
    CombinedRate { column: &'static str, won: &'static str, lost: &'static str },
}

impl MetricSpec {
    pub fn column(&self) -> &'static str {
        match self {
            MetricSpec::Rate { column, .. }
            | MetricSpec::Differential { column, .. }
            | MetricSpec::CombinedRate { column, .. } => *column,
        }
    }

    pub fn inputs(&self) -> [&'static str; 2] {
        match self {
            MetricSpec::Rate { numerator, denominator, .. } => [*numerator, *denominator],
            MetricSpec::Differential { lhs, rhs, .. } => [*lhs, *rhs],
            MetricSpec::CombinedRate { won, lost, .. } => [*won, *lost],
        }
    }

    fn compute(&self, row: &Row) -> String {
        let [a, b] = self.inputs().map(|c| row.get(c).as_f64());
        match self {
            MetricSpec::Rate { .. } => formula::rate(a, b),
            MetricSpec::Differential { .. } => formula::differential(a, b),
            MetricSpec::CombinedRate { .. } => formula::combined_rate(a, b),
        }
    }
}

pub const STANDARD_METRICS: &[MetricSpec] = &[
    MetricSpec::Rate { column: "Shooting_Conversion_Rate", numerator: "Goals", denominator: "Sh" },
    MetricSpec::Rate { column: "Pass_Completion_Rate", numerator: "Cmp", denominator: "Att" },
    MetricSpec::Differential { column: "xG_Overperformance", lhs: "Goals", rhs: "xG" },
    MetricSpec::Differential { column: "xA_Overperformance", lhs: "Assists", rhs: "xA" },
    MetricSpec::Rate { column: "Dribble_Completion_Rate", numerator: "Dribbles Succ", denominator: "Dribbles Att" },
    MetricSpec::CombinedRate { column: "Aerial_Duels_Win_Percentage", won: "Aerial Duels Won", lost: "Aerial Duels Lost" },
];

/// Adds derived and placeholder columns to a merged table.
#[derive(Debug, Clone)]
pub struct Calculator {
    metrics: Vec<MetricSpec>,
    placeholders: Vec<UnavailableMetric>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(STANDARD_METRICS.to_vec(), UNAVAILABLE_METRICS.to_vec())
    }
}

impl Calculator {
    pub fn new(metrics: Vec<MetricSpec>, placeholders: Vec<UnavailableMetric>) -> Self {
        Self { metrics, placeholders }
    }

    /// Metrics whose inputs all exist in `table`'s schema.
    pub fn applicable<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a MetricSpec> + 'a {
        self.metrics
            .iter()
            .filter(move |m| m.inputs().iter().all(|c| table.has_column(c)))
    }

    /// Returns a new table; the input is left untouched. Running it again on its
    /// own output reproduces the same values and column order.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn derive(&self, table: &MergedTable) -> MergedTable {
        let start = Instant::now();
        let metrics: Vec<&MetricSpec> = self.applicable(table).collect();
        let skipped: Vec<&str> = self
            .metrics
            .iter()
            .filter(|m| !metrics.contains(m))
            .map(MetricSpec::column)
            .collect();
        if !skipped.is_empty() {
            debug!(skipped = ?skipped, "Metric inputs absent from schema");
        }
        for p in self.placeholders.iter().filter(|p| sourced(table, p.column)) {
            warn!(column = p.column, needs = p.needs, "Sourced column is declared unavailable, overwriting");
        }

        let mut out = Table::with_columns(table.columns().iter().cloned());
        for m in &metrics {
            out.add_column(m.column());
        }
        for p in &self.placeholders {
            out.add_column(p.column);
        }

        for row in table.rows() {
            let mut derived = row.clone();
            for m in &metrics {
                derived.set(m.column(), Cell::Text(m.compute(row)));
            }
            // Declared-unavailable wins over anything scraped under the same name
            for p in &self.placeholders {
                derived.set(p.column, Cell::from(NOT_AVAILABLE));
            }
            out.push(derived);
        }

        info!(
            derived = metrics.len(),
            placeholders = self.placeholders.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Derived metrics"
        );
        MergedTable::from_table(out)
    }
}

// Any row holding a real value for a declared-unavailable column
fn sourced(table: &Table, column: &str) -> bool {
    table.rows().iter().any(|r| {
        let cell = r.get(column);
        !cell.is_null() && cell.as_str() != Some(NOT_AVAILABLE)
    })
}
