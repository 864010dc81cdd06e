//! Static district (DR) reference data
//!
//! The 14 regions are fixed for the survey; the importer seeds them before
//! any household row is written.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Canonical code -> name mapping for the 14 districts.
pub const REGIONS: [(&str, &str); 14] = [
    ("01", "DAKAR"),
    ("02", "ZIGUINCHOR"),
    ("03", "DIOURBEL"),
    ("04", "SAINT-LOUIS"),
    ("05", "TAMBACOUNDA"),
    ("06", "KAOLACK"),
    ("07", "THIES"),
    ("08", "LOUGA"),
    ("09", "FATICK"),
    ("10", "KOLDA"),
    ("11", "MATAM"),
    ("12", "KAFFRINE"),
    ("13", "KEDOUGOU"),
    ("14", "SEDHIOU"),
];

/// Region name for a 2-digit code, if the code is a known district.
pub fn nom_region(code_dr: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(code, _)| *code == code_dr)
        .map(|(_, nom)| *nom)
}

/// Seed/refresh the regions table from the static mapping.
pub async fn seed_regions(pool: &SqlitePool) -> Result<()> {
    for (code, nom) in REGIONS {
        sqlx::query(
            "INSERT INTO regions (code_dr, nom_region) VALUES (?, ?)
             ON CONFLICT(code_dr) DO UPDATE SET nom_region = excluded.nom_region",
        )
        .bind(code)
        .bind(nom)
        .execute(pool)
        .await?;
    }
    info!("{} régions importées/mises à jour", REGIONS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(nom_region("01"), Some("DAKAR"));
        assert_eq!(nom_region("14"), Some("SEDHIOU"));
        assert_eq!(nom_region("15"), None);
        assert_eq!(nom_region("1"), None);
    }
}
