//! Database initialization
//!
//! Opens (and creates on first run) the shared SQLite database, then applies
//! the idempotent schema. Both the API service and the importer call
//! [`init_database`] at startup; tests use [`init_in_memory`].

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_tables(&pool).await?;

    Ok(pool)
}

/// In-memory database for tests.
///
/// A single connection is mandatory: every SQLite `:memory:` connection is its
/// own database, so a larger pool would hand out empty databases.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    configure_connection(&pool).await?;
    create_tables(&pool).await?;

    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    // Foreign keys are off by default in SQLite; the menages->regions
    // protective constraint depends on this pragma.
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows the API service to keep reading while an import writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create all tables (idempotent - safe to call multiple times)
async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS regions (
            code_dr TEXT PRIMARY KEY,
            nom_region TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS superviseurs (
            id_superviseur TEXT PRIMARY KEY
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS enqueteurs (
            login_enq TEXT PRIMARY KEY,
            nom_enqueteur TEXT NOT NULL,
            superviseur_id TEXT
                REFERENCES superviseurs(id_superviseur) ON DELETE SET NULL
        )",
    )
    .execute(pool)
    .await?;

    // code_dr is RESTRICT: a region cannot be deleted while households
    // still reference it
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS menages (
            idmng TEXT PRIMARY KEY,
            code_dr TEXT NOT NULL
                REFERENCES regions(code_dr) ON DELETE RESTRICT,
            superviseur_code TEXT,
            login_enq TEXT
                REFERENCES enqueteurs(login_enq) ON DELETE SET NULL,
            hh_trimestre TEXT,
            cons_code TEXT,
            num_men_csv TEXT,
            nom_cc TEXT,
            nom_cm TEXT,
            statut_menage INTEGER NOT NULL DEFAULT 1,
            tirage INTEGER,
            adresse TEXT,
            telephone1 TEXT,
            taille_men INTEGER,
            nbr_eligible INTEGER,
            date_enquete DATE,
            heure_debut_enquete TIME,
            heure_fin_enquete TIME,
            observations TEXT,
            is_rural INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await?;

    // Indexes backing the statistics and filter queries
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_menages_code_dr ON menages(code_dr)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_menages_statut ON menages(statut_menage)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_menages_tirage ON menages(tirage)")
        .execute(pool)
        .await?;

    Ok(())
}
