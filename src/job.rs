// src/job.rs

use reqwest::Client;
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, instrument};

use crate::config::JobConfig;
use crate::error::ExportError;
use crate::fetch::{HttpTransport, Transport};
use crate::report::{ExportData, ReportPipeline, RunReport};
use crate::schema::{load_definition, TableSpec};
use crate::tdl::SubstitutionSet;

/// Everything a run needs before touching the network.
fn prepare(cfg: &JobConfig) -> Result<(Vec<TableSpec>, SubstitutionSet), ExportError> {
    let def = load_definition(&cfg.definition)?;
    let tables = def.select(cfg.import_master, cfg.import_transaction);
    let substitutions = cfg.substitutions()?;
    Ok((tables, substitutions))
}

/// Run a job against the engine named in `cfg`.
#[instrument(level = "info", skip(cfg), fields(definition = %cfg.definition.display(), server = %cfg.server, port = cfg.port))]
pub async fn run_job(cfg: &JobConfig) -> Result<RunReport, ExportError> {
    let (tables, substitutions) = prepare(cfg)?;
    let transport = HttpTransport::new(Client::new(), &cfg.server, cfg.port)?;
    run_tables(cfg, tables, substitutions, transport).await
}

/// Run a job over a caller-supplied transport.
pub async fn run_job_with<T: Transport>(cfg: &JobConfig, transport: T) -> Result<RunReport, ExportError> {
    let (tables, substitutions) = prepare(cfg)?;
    run_tables(cfg, tables, substitutions, transport).await
}

async fn run_tables<T: Transport>(
    cfg: &JobConfig,
    tables: Vec<TableSpec>,
    substitutions: SubstitutionSet,
    transport: T,
) -> Result<RunReport, ExportError> {
    info!(tables = tables.len(), company = cfg.company(), "starting export");
    let pipeline = ReportPipeline::new(transport, cfg.company(), substitutions);
    Ok(pipeline.run(&tables).await)
}

/// The JSON envelope both front ends answer with.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExportData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResponse {
    pub fn success(data: ExportData) -> Self {
        Self {
            status: "success",
            message: "Data retrieved successfully".into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn definition_missing() -> Self {
        Self {
            status: "error",
            message: "Export definition file does not exist or is invalid.".into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(err: impl Display) -> Self {
        Self {
            status: "error",
            message: "An error occurred while processing the request.".into(),
            data: None,
            error: Some(err.to_string()),
        }
    }
}
