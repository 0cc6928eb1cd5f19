use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

// Identity columns every normalized row carries
pub const PLAYER_NAME: &str = "player_name";
pub const CLUB_NAME: &str = "club_name";

/// One scraped or computed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Scraped inner text: blank -> Null, everything else kept verbatim (trimmed).
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() { Cell::Null } else { Cell::Text(s.to_string()) }
    }

    /// Like `text`, but numeric-looking cells become `Number` (what an HTML table reader infers).
    pub fn inferred(s: &str) -> Self {
        match Cell::text(s) {
            Cell::Text(t) => match parse_number(&t) {
                Some(n) => Cell::Number(n),
                None => Cell::Text(t),
            },
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell. Non-numeric, NaN and infinite values read as `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(t) => parse_number(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(t) => write!(f, "{}", t),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

// Accepts "1,234", " 8.50 ", "-3"; rejects NaN/inf spellings and empty strings
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// (player_name, club_name) as produced by a `KeyMatcher`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub player: String,
    pub club: String,
}

impl IdentityKey {
    pub fn new(player: impl Into<String>, club: impl Into<String>) -> Self {
        Self { player: player.into(), club: club.into() }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.player, self.club)
    }
}

/// Ordered column -> cell mapping. Missing columns read as `Cell::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, Cell>,
}

static NULL: Cell = Cell::Null;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(player: &str, club: &str) -> Self {
        let mut row = Row::new();
        row.set(PLAYER_NAME, Cell::text(player));
        row.set(CLUB_NAME, Cell::text(club));
        row
    }

    pub fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&NULL)
    }

    /// Inserts or overwrites in place; a new column goes to the end.
    pub fn set(&mut self, column: impl Into<String>, value: Cell) {
        self.cells.insert(column.into(), value);
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Trimmed, non-blank identity strings, or `None` when either is missing.
    pub fn identity(&self) -> Option<(&str, &str)> {
        let player = self.get(PLAYER_NAME).as_str().map(str::trim).filter(|s| !s.is_empty())?;
        let club = self.get(CLUB_NAME).as_str().map(str::trim).filter(|s| !s.is_empty())?;
        Some((player, club))
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Row { cells: iter.into_iter().collect() }
    }
}

/// Rows plus the ordered union of their columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new();
        for c in columns {
            table.add_column(c);
        }
        table
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Table::new();
        for row in rows {
            table.push(row);
        }
        table
    }

    /// Appends a row, extending the schema with any column it introduces.
    pub fn push(&mut self, row: Row) {
        for c in row.columns() {
            if !self.has_column(c) {
                self.columns.push(c.to_string());
            }
        }
        self.rows.push(row);
    }

    /// Adds a column to the schema only; rows are left untouched.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, player: &str, club: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.identity() == Some((player, club)))
    }
}
