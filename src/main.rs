use anyhow::{Context, Result};
use std::{env, fs, path::PathBuf};
use tdlbridge::{run_job, JobConfig, JobResponse};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) read job config ──────────────────────────────────────────
    let mut args = env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| "config.json".into()));
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "data.json".into()));

    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let cfg: JobConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    // ─── 3) run every table ──────────────────────────────────────────
    let response = match run_job(&cfg).await {
        Ok(report) => {
            for failure in report.failures() {
                error!("{}", failure);
            }
            info!(exported = report.exported(), "export finished");
            JobResponse::success(report.into_data())
        }
        Err(e) if e.is_definition_missing() => {
            error!("{}", e);
            JobResponse::definition_missing()
        }
        Err(e) => {
            error!("export failed: {}", e);
            JobResponse::failure(e)
        }
    };

    // ─── 4) write output ─────────────────────────────────────────────
    let json = serde_json::to_string_pretty(&response)?;
    fs::write(&output_path, json)
        .with_context(|| format!("writing {}", output_path.display()))?;
    info!("wrote {}", output_path.display());

    if response.status != "success" {
        anyhow::bail!("{}", response.message);
    }
    Ok(())
}
