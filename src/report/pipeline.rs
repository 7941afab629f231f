// src/report/pipeline.rs

use tracing::{error, info, instrument, warn};

use super::outcome::{RunReport, TableOutcome};
use crate::error::{TableError, TableErrorKind};
use crate::fetch::Transport;
use crate::process::{decode, DecodedRow};
use crate::schema::TableSpec;
use crate::tdl::{
    compile, substitute, unresolved_placeholders, SubstitutionSet, PERIOD_PLACEHOLDERS,
};

/// Compile → substitute → send → decode, one table at a time.
///
/// The company and substitution values are fixed for the pipeline's lifetime,
/// so every table in a run sees the same period and company.
pub struct ReportPipeline<T> {
    transport: T,
    company: String,
    substitutions: SubstitutionSet,
}

impl<T: Transport> ReportPipeline<T> {
    pub fn new(transport: T, company: impl Into<String>, substitutions: SubstitutionSet) -> Self {
        Self {
            transport,
            company: company.into(),
            substitutions,
        }
    }

    /// Process a single table.
    #[instrument(level = "info", skip(self, table), fields(table = %table.name))]
    pub async fn process_table(&self, table: &TableSpec) -> Result<Vec<DecodedRow>, TableError> {
        let compiled = compile(table, &self.company);
        let request = substitute(&compiled, &self.substitutions);

        let missing = unresolved_placeholders(&request, &PERIOD_PLACEHOLDERS);
        if !missing.is_empty() {
            warn!(?missing, "refusing to send request with placeholders");
            return Err(TableError::new(
                &table.name,
                TableErrorKind::UnresolvedPlaceholders(missing),
            ));
        }

        let reply = self
            .transport
            .send(&request)
            .await
            .map_err(|e| TableError::new(&table.name, e))?;

        Ok(decode(&reply, &table.fields))
    }

    /// Process every table in order. A failing table is logged and recorded;
    /// the remaining tables still run.
    pub async fn run(&self, tables: &[TableSpec]) -> RunReport {
        let mut report = RunReport::default();
        for table in tables {
            let outcome = match self.process_table(table).await {
                Ok(rows) => {
                    info!(table = %table.name, rows = rows.len(), "exported table");
                    TableOutcome::Exported {
                        table: table.name.clone(),
                        rows,
                    }
                }
                Err(err) => {
                    error!(table = %table.name, error = %err, "skipping table");
                    TableOutcome::Failed(err)
                }
            };
            report.push(outcome);
        }
        info!(
            tables = tables.len(),
            exported = report.exported(),
            "run finished"
        );
        report
    }
}
