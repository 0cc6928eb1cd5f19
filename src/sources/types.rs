// Raw extracts as the fetchers hand them over (already pulled out of the page DOM).

use std::fmt;

use serde::Deserialize;

/// Stat categories on the standings site, in intra-source merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Standard,
    Shooting,
    Passing,
    Gca, // goal and shot creation
    Defense,
    Possession,
    Misc,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Standard => "standard",
            Category::Shooting => "shooting",
            Category::Passing => "passing",
            Category::Gca => "gca",
            Category::Defense => "defense",
            Category::Possession => "possession",
            Category::Misc => "misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One category page. `headers[i]` holds the header levels of column i, top level first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryTable {
    pub category: Category,
    pub headers: Vec<Vec<String>>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

// Source A
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StandingsExtract {
    #[serde(default)]
    pub tables: Vec<CategoryTable>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tab {
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

// Source B
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TabbedExtract {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

// Source C: empty `headers` means the page's fixed column layout
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueExtract {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawExtract {
    Standings(StandingsExtract),
    Tabbed(TabbedExtract),
    League(LeagueExtract),
}

impl RawExtract {
    pub fn source(&self) -> super::SourceId {
        match self {
            RawExtract::Standings(_) => super::SourceId::Standings,
            RawExtract::Tabbed(_) => super::SourceId::Tabbed,
            RawExtract::League(_) => super::SourceId::League,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_standings() {
        let json = r#"{"tables":[{"category":"gca","headers":[["","Player"],["SCA","SCA90"]],"rows":[["A","1.2"]]}]}"#;
        let extract: StandingsExtract = serde_json::from_str(json).unwrap();
        assert_eq!(extract.tables[0].category, Category::Gca);
        assert_eq!(extract.tables[0].headers[1], vec!["SCA", "SCA90"]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let extract: LeagueExtract = serde_json::from_str(r#"{"rows":[["A","B"]]}"#).unwrap();
        assert!(extract.headers.is_empty());
        let tabbed: TabbedExtract = serde_json::from_str("{}").unwrap();
        assert!(tabbed.tabs.is_empty());
    }

    #[test]
    fn test_category_order() {
        let mut cats = vec![Category::Misc, Category::Standard, Category::Gca];
        cats.sort();
        assert_eq!(cats, vec![Category::Standard, Category::Gca, Category::Misc]);
    }
}
