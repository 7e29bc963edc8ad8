//! In-memory forecast table.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::domain::Record;

/// The loaded table: one `Record` per source row, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct Area values.
    pub fn areas(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.area.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Rows for one area, in file order.
    pub fn rows_for<'a>(&'a self, area: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.area == area)
    }

    /// Number of rows whose (Area, Date) key already appeared earlier in the table.
    pub fn duplicate_keys(&self) -> usize {
        let mut seen: HashSet<(&str, NaiveDate)> = HashSet::with_capacity(self.records.len());
        self.records
            .iter()
            .filter(|r| !seen.insert((r.area.as_str(), r.date)))
            .count()
    }
}
