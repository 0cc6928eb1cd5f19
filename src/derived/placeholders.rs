// Columns downstream consumers expect but no current source can fill.

/// A known metric with no data source yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnavailableMetric {
    pub column: &'static str,
    /// What kind of feed would fill it.
    pub needs: &'static str,
}

pub const UNAVAILABLE_METRICS: &[UnavailableMetric] = &[
    UnavailableMetric { column: "Top_Speed", needs: "physical tracking" },
    UnavailableMetric { column: "Distance_Covered", needs: "physical tracking" },
    UnavailableMetric { column: "Big_Chances_Created", needs: "event data" },
    UnavailableMetric { column: "Big_Chances_Missed", needs: "event data" },
    UnavailableMetric { column: "Usage_Rate", needs: "possession chains" },
    UnavailableMetric { column: "Ground_Duels_Won", needs: "duel breakdown" },
    UnavailableMetric { column: "Passes_Leading_to_Shots", needs: "event data" },
];
