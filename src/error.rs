// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures loading or interpreting the job configuration. Fatal to a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("export definition {0:?} does not exist")]
    DefinitionMissing(PathBuf),

    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing export definition {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {name} date {value:?}, expected yyyy-MM-dd")]
    InvalidDate { name: &'static str, value: String },

    #[error("invalid engine endpoint {0}")]
    InvalidEndpoint(String),
}

/// Failures of a single request/reply round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to engine failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("engine answered with status {0}")]
    Status(reqwest::StatusCode),
}

/// What went wrong while processing one table.
#[derive(Debug, Error)]
pub enum TableErrorKind {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unresolved placeholders after substitution: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),
}

/// A per-table failure tagged with the table it belongs to.
#[derive(Debug, Error)]
#[error("table {table}: {kind}")]
pub struct TableError {
    pub table: String,
    #[source]
    pub kind: TableErrorKind,
}

impl TableError {
    pub fn new(table: impl Into<String>, kind: impl Into<TableErrorKind>) -> Self {
        Self {
            table: table.into(),
            kind: kind.into(),
        }
    }
}

/// Run-level failure; everything per-table is isolated in `TableError` instead.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExportError {
    /// True when the export definition file could not be found.
    pub fn is_definition_missing(&self) -> bool {
        matches!(self, ExportError::Config(ConfigError::DefinitionMissing(_)))
    }
}
