use std::path::PathBuf;

use attendance_sheet_backend::{build_router, initialize, BackendConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = BackendConfig::load_or_default(config_path.as_deref())?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = initialize(&config)?;
    let app = build_router(state, &config);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Attendance record store listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
