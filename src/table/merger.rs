use std::ops::Deref;

use ahash::{AHashMap, AHashSet};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::table::types::{Cell, IdentityKey, Row, Table, CLUB_NAME, PLAYER_NAME};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("no source produced usable data")]
    NoUsableData,
    #[error("row {row} of {table} table has no usable identity key")]
    MissingIdentityKey { table: &'static str, row: usize },
}

/// Turns a row's identity strings into the join key.
/// Swap this out (e.g. for alias-aware matching) without touching the join itself.
pub trait KeyMatcher: Send + Sync {
    fn key(&self, player: &str, club: &str) -> IdentityKey;
}

/// Case-sensitive exact match on the trimmed strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl KeyMatcher for ExactMatch {
    fn key(&self, player: &str, club: &str) -> IdentityKey {
        IdentityKey::new(player, club)
    }
}

/// Output of a merge: one row per identity key, every row carrying every column.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable(Table);

impl MergedTable {
    pub fn into_table(self) -> Table {
        self.0
    }

    // Callers outside the crate only get merged tables out of `merge*` / `derive`
    pub(crate) fn from_table(table: Table) -> Self {
        MergedTable(table)
    }
}

impl Deref for MergedTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.0
    }
}

/// Merge the three per-source tables in fixed precedence order (A, B, C).
pub fn merge(standings: Table, tabbed: Table, league: Table) -> Result<MergedTable, MergeError> {
    merge_with(
        &ExactMatch,
        [("standings", standings), ("tabbed", tabbed), ("league", league)],
    )
}

/// Outer-join `tables` in the order given. The first non-empty table seeds the
/// accumulator; for every later one, columns the accumulator already has are dropped.
#[instrument(skip_all)]
pub fn merge_with<I>(matcher: &dyn KeyMatcher, tables: I) -> Result<MergedTable, MergeError>
where
    I: IntoIterator<Item = (&'static str, Table)>,
{
    let mut acc: Option<Accumulator> = None;

    for (label, table) in tables {
        if table.is_empty() {
            debug!(table = label, "Skipping empty table");
            continue;
        }
        match acc.as_mut() {
            None => acc = Some(Accumulator::seed(label, table, matcher)?),
            Some(a) => a.join(label, table, matcher)?,
        }
    }

    let merged = acc.ok_or(MergeError::NoUsableData)?.finish();
    info!(rows = merged.len(), columns = merged.columns().len(), "Merged tables");
    Ok(merged)
}

struct Accumulator {
    columns: Vec<String>,
    rows: Vec<Row>,
    index: AHashMap<IdentityKey, usize>,
}

impl Accumulator {
    fn seed(label: &'static str, table: Table, matcher: &dyn KeyMatcher) -> Result<Self, MergeError> {
        let mut acc = Accumulator {
            columns: Vec::with_capacity(table.columns().len()),
            rows: Vec::with_capacity(table.len()),
            index: AHashMap::with_capacity(table.len()),
        };
        // Identity columns lead, whatever order the source used
        acc.columns.push(PLAYER_NAME.to_string());
        acc.columns.push(CLUB_NAME.to_string());
        acc.columns.extend(table.columns().iter().filter(|c| !is_identity(c)).cloned());

        for (i, row) in table.into_rows().into_iter().enumerate() {
            let key = key_of(label, i, &row, matcher)?;
            if acc.index.contains_key(&key) {
                warn!(table = label, key = %key, "Duplicate identity key, keeping first row");
                continue;
            }
            acc.index.insert(key, acc.rows.len());
            acc.rows.push(row);
        }
        debug!(table = label, rows = acc.rows.len(), "Seeded accumulator");
        Ok(acc)
    }

    fn join(&mut self, label: &'static str, table: Table, matcher: &dyn KeyMatcher) -> Result<(), MergeError> {
        let (dropped, added): (Vec<String>, Vec<String>) = table
            .columns()
            .iter()
            .filter(|c| !is_identity(c))
            .cloned()
            .partition(|c| self.columns.contains(c));
        if !dropped.is_empty() {
            debug!(table = label, dropped = ?dropped, "Dropping columns already merged");
        }

        let previous_columns = self.columns.len();
        let mut seen: AHashSet<IdentityKey> = AHashSet::with_capacity(table.len());
        let mut matched = 0usize;
        let mut appended = 0usize;

        for (i, row) in table.into_rows().into_iter().enumerate() {
            let key = key_of(label, i, &row, matcher)?;
            if !seen.insert(key.clone()) {
                warn!(table = label, key = %key, "Duplicate identity key, keeping first row");
                continue;
            }

            let existing = self.index.get(&key).copied();
            match existing {
                Some(pos) => {
                    let target = &mut self.rows[pos];
                    for c in &added {
                        target.set(c.as_str(), row.get(c).clone());
                    }
                    matched += 1;
                }
                None => {
                    let mut fresh = Row::new();
                    for c in &self.columns[..previous_columns] {
                        let value = if is_identity(c) { row.get(c).clone() } else { Cell::Null };
                        fresh.set(c.as_str(), value);
                    }
                    for c in &added {
                        fresh.set(c.as_str(), row.get(c).clone());
                    }
                    self.index.insert(key, self.rows.len());
                    self.rows.push(fresh);
                    appended += 1;
                }
            }
        }

        self.columns.extend(added);
        debug!(table = label, matched, appended, columns = self.columns.len(), "Joined table");
        Ok(())
    }

    // Every row gets every column, in schema order
    fn finish(self) -> MergedTable {
        let mut table = Table::with_columns(self.columns.iter().cloned());
        for row in self.rows {
            let full: Row = self.columns.iter().map(|c| (c.clone(), row.get(c).clone())).collect();
            table.push(full);
        }
        MergedTable(table)
    }
}

fn is_identity(column: &str) -> bool {
    column == PLAYER_NAME || column == CLUB_NAME
}

fn key_of(label: &'static str, row_idx: usize, row: &Row, matcher: &dyn KeyMatcher) -> Result<IdentityKey, MergeError> {
    row.identity()
        .map(|(player, club)| matcher.key(player, club))
        .ok_or(MergeError::MissingIdentityKey { table: label, row: row_idx })
}
