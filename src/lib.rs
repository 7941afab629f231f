//! Compile table definitions into export requests for an accounting engine,
//! send them, and decode the tagged replies back into rows.

pub mod config;
pub mod error;
pub mod fetch;
pub mod job;
pub mod process;
pub mod report;
pub mod schema;
pub mod tdl;

pub use config::JobConfig;
pub use error::{ConfigError, ExportError, TableError, TableErrorKind, TransportError};
pub use job::{run_job, run_job_with, JobResponse};
pub use process::DecodedRow;
pub use report::{ExportData, ReportPipeline, RunReport, TableOutcome};
pub use schema::{ExportDefinition, FieldSpec, FieldType, TableSpec};
