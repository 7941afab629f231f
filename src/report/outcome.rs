// src/report/outcome.rs

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::TableError;
use crate::process::DecodedRow;

/// Result of processing one table.
#[derive(Debug)]
pub enum TableOutcome {
    Exported { table: String, rows: Vec<DecodedRow> },
    Failed(TableError),
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Exported { table, .. } => table,
            TableOutcome::Failed(err) => &err.table,
        }
    }

    pub fn is_exported(&self) -> bool {
        matches!(self, TableOutcome::Exported { .. })
    }
}

/// Every table's outcome for one run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<TableOutcome>,
}

impl RunReport {
    pub fn push(&mut self, outcome: TableOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn exported(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_exported()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableError> {
        self.outcomes.iter().filter_map(|o| match o {
            TableOutcome::Failed(err) => Some(err),
            TableOutcome::Exported { .. } => None,
        })
    }

    /// Rows of the tables that succeeded; failed tables are left out.
    pub fn into_data(self) -> ExportData {
        let mut data = ExportData::default();
        for outcome in self.outcomes {
            if let TableOutcome::Exported { table, rows } = outcome {
                data.insert(table, rows);
            }
        }
        data
    }
}

/// Table name → rows. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportData {
    tables: Vec<(String, Vec<DecodedRow>)>,
}

impl ExportData {
    /// A later table with the same name replaces the earlier one's rows.
    pub fn insert(&mut self, table: String, rows: Vec<DecodedRow>) {
        match self.tables.iter_mut().find(|(t, _)| *t == table) {
            Some(entry) => entry.1 = rows,
            None => self.tables.push((table, rows)),
        }
    }

    pub fn get(&self, table: &str) -> Option<&[DecodedRow]> {
        self.tables
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(t, _)| t.as_str())
    }
}

impl Serialize for ExportData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (table, rows) in &self.tables {
            map.serialize_entry(table, rows)?;
        }
        map.end()
    }
}
