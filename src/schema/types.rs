// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// Semantic type of an exported field; selects its value expression.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Logical,
    Date,
    Number,
    Amount,
    Quantity,
    Rate,
    #[default]
    Raw,
    /// Any type name the definition file uses that we do not know.
    #[serde(other)]
    Unknown,
}

/// One output column: `name` is the key in decoded rows, `field` is the
/// engine-side method name or a literal expression.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct FieldSpec {
    pub name: String,
    pub field: String,
    #[serde(rename = "type", default)]
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            ty,
        }
    }
}

/// A table to export: the collection path to walk and the fields to emit per record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct TableSpec {
    pub name: String,
    /// Dotted path, e.g. `Voucher.AllLedgerEntries`.
    pub collection: String,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub fetch: Vec<String>,
    #[serde(default)]
    pub filters: Vec<String>,
}

/// The parsed export definition file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ExportDefinition {
    #[serde(default)]
    pub master: Vec<TableSpec>,
    #[serde(default)]
    pub transaction: Vec<TableSpec>,
}

impl ExportDefinition {
    /// Tables to process for a run, masters first, each list in file order.
    pub fn select(&self, master: bool, transaction: bool) -> Vec<TableSpec> {
        let mut tables = Vec::new();
        if master {
            tables.extend(self.master.iter().cloned());
        }
        if transaction {
            tables.extend(self.transaction.iter().cloned());
        }
        tables
    }
}
