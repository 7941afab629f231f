pub mod outcome;
pub mod pipeline;

pub use outcome::{ExportData, RunReport, TableOutcome};
pub use pipeline::ReportPipeline;
