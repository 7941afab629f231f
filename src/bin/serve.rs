use anyhow::Result;
use serde::Deserialize;
use std::env;
use tdlbridge::{run_job, JobConfig, JobResponse};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

#[derive(Deserialize)]
struct ExportRequest {
    config: JobConfig,
}

async fn hello() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "success",
        "message": "Hello"
    })))
}

async fn export(req: ExportRequest) -> Result<impl Reply, Rejection> {
    let cfg = req.config;
    info!(
        "export request: definition={}, period={}..{}, company={}",
        cfg.definition.display(),
        cfg.from_date,
        cfg.to_date,
        cfg.company()
    );

    let (status, body) = match run_job(&cfg).await {
        Ok(report) => {
            for failure in report.failures() {
                error!("{}", failure);
            }
            (StatusCode::OK, JobResponse::success(report.into_data()))
        }
        Err(e) if e.is_definition_missing() => {
            error!("{}", e);
            (StatusCode::BAD_REQUEST, JobResponse::definition_missing())
        }
        Err(e) => {
            error!("export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, JobResponse::failure(e))
        }
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

fn routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let hello = warp::path::end().and(warp::get()).and_then(hello);
    let export = warp::path::end()
        .and(warp::post())
        .and(warp::body::json())
        .and_then(export);
    hello.or(export)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    info!("Server is running at http://localhost:{}", port);
    warp::serve(routes()).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
