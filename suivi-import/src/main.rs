//! suivi-import - CSV import entry point
//!
//! Merges the INFO_GEN / INFO_MEN_RECORD field exports into the survey
//! monitoring database. One run is a stand-alone batch job; do not run two
//! imports against the same database at once.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use suivi_common::config::resolve_database_path;
use suivi_common::db::init_database;
use suivi_import::{run_import, ImportOptions};

/// Command-line arguments for suivi-import
#[derive(Parser, Debug)]
#[command(name = "suivi-import")]
#[command(about = "CSV import for the survey monitoring database")]
#[command(version)]
struct Args {
    /// General enumeration export
    #[arg(long, default_value = "INFO_GEN.CSV")]
    info_gen: PathBuf,

    /// Per-household record export
    #[arg(long, default_value = "INFO_MEN_RECORD.CSV")]
    info_men_record: PathBuf,

    /// SQLite database file (falls back to SUIVI_DATABASE, then ./suivi.db)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Delete all existing rows before importing instead of upserting
    #[arg(long)]
    reset: bool,
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

    info!("Starting suivi-import v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let db_path = resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let opts = ImportOptions {
        info_gen: args.info_gen,
        info_men_record: args.info_men_record,
        reset: args.reset,
    };

    match run_import(&pool, &opts).await {
        Ok(summary) => {
            info!(
                "Import terminé: {} superviseurs, {} enquêteurs, {} ménages ({} ignorés)",
                summary.superviseurs,
                summary.enqueteurs,
                summary.menages_importes,
                summary.menages_ignores
            );
            Ok(())
        }
        Err(e) => {
            error!("Import interrompu: {}", e);
            std::process::exit(1);
        }
    }
}
