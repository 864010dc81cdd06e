//! suivi-api - REST service for survey field monitoring
//!
//! Serves the household/enquêteur/region tables populated by suivi-import,
//! plus the coverage statistics consumed by the dashboard.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use suivi_api::{build_router, AppState};
use suivi_common::config::resolve_database_path;
use suivi_common::db::init_database;

/// Command-line arguments for suivi-api
#[derive(Parser, Debug)]
#[command(name = "suivi-api")]
#[command(about = "Survey field-monitoring REST service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "SUIVI_API_PORT")]
    port: u16,

    /// SQLite database file (falls back to SUIVI_DATABASE, then ./suivi.db)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting suivi-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let db_path = resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    info!("✓ Database ready");

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("suivi-api listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
