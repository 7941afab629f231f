pub mod load;
pub mod types;

pub use load::{load_definition, parse_definition};
pub use types::{ExportDefinition, FieldSpec, FieldType, TableSpec};
