// Derived statistics computed after the merge
pub mod formula;       // total rate / differential formulas
pub mod calculator;    // applies metric specs row by row
pub mod placeholders;  // declared columns with no data source yet

pub use calculator::{Calculator, MetricSpec, STANDARD_METRICS};
pub use formula::{NOT_AVAILABLE, ZERO_RATE};
pub use placeholders::{UnavailableMetric, UNAVAILABLE_METRICS};

use crate::table::MergedTable;

/// `Calculator::default().derive(table)`.
pub fn derive(table: &MergedTable) -> MergedTable {
    Calculator::default().derive(table)
}
