//! Coverage statistics endpoints
//!
//! Computed on demand from the current table state, no caching. A "collected"
//! household has statut complet or partiel; an "expected" household has
//! tirage = 1. Coverage is collected/expected x 100, guarded to 0 when the
//! denominator is 0.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;
use suivi_common::db::Region;
use suivi_common::StatutMenage;

use crate::{api::ApiError, AppState};

/// Rural/urban split of a count
#[derive(Debug, Serialize)]
pub struct ScopeCounts {
    pub total: i64,
    pub rural: i64,
    pub urbain: i64,
}

/// Coverage ratios, percent rounded to 2 decimals
#[derive(Debug, Serialize)]
pub struct TauxCouverture {
    pub global: f64,
    pub rural: f64,
    pub urbain: f64,
}

/// One entry of the status histogram
#[derive(Debug, Serialize)]
pub struct StatutCount {
    pub statut_code: i64,
    pub statut_nom: &'static str,
    pub count: i64,
}

/// GET /stats/global/ response
#[derive(Debug, Serialize)]
pub struct GlobalStats {
    pub menages_attendus: ScopeCounts,
    pub menages_collectes: ScopeCounts,
    pub taux_de_couverture: TauxCouverture,
    pub repartition_statuts: Vec<StatutCount>,
}

/// One region of the GET /stats/regions/ response
#[derive(Debug, Serialize)]
pub struct RegionStats {
    pub code_dr: String,
    pub nom_region: String,
    pub menages_attendus: i64,
    pub menages_collectes: i64,
    pub taux_de_couverture: f64,
    pub repartition_statuts: Vec<StatutCount>,
}

/// collected/expected x 100, rounded to 2 decimals; 0 when nothing expected
fn taux(collectes: i64, attendus: i64) -> f64 {
    if attendus == 0 {
        return 0.0;
    }
    let pct = collectes as f64 / attendus as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// total + rural split of expected households (global scope)
async fn count_attendus(db: &SqlitePool) -> Result<ScopeCounts, sqlx::Error> {
    let (total, rural): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(is_rural), 0) FROM menages WHERE tirage = 1",
    )
    .fetch_one(db)
    .await?;

    Ok(ScopeCounts {
        total,
        rural,
        urbain: total - rural,
    })
}

/// total + rural split of collected households (global scope)
async fn count_collectes(db: &SqlitePool) -> Result<ScopeCounts, sqlx::Error> {
    let (total, rural): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(is_rural), 0) FROM menages
         WHERE statut_menage IN (?, ?)",
    )
    .bind(StatutMenage::Complet.code())
    .bind(StatutMenage::Partiel.code())
    .fetch_one(db)
    .await?;

    Ok(ScopeCounts {
        total,
        rural,
        urbain: total - rural,
    })
}

/// Full status histogram, zero-filled across the 7 codes, sorted by code
async fn repartition_statuts(
    db: &SqlitePool,
    code_dr: Option<&str>,
) -> Result<Vec<StatutCount>, sqlx::Error> {
    let rows: Vec<(i64, i64)> = match code_dr {
        Some(code) => {
            sqlx::query_as(
                "SELECT statut_menage, COUNT(*) FROM menages
                 WHERE code_dr = ? GROUP BY statut_menage",
            )
            .bind(code)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT statut_menage, COUNT(*) FROM menages GROUP BY statut_menage")
                .fetch_all(db)
                .await?
        }
    };

    let counts: HashMap<i64, i64> = rows.into_iter().collect();

    // ALL is in ascending code order, so the histogram comes out sorted
    Ok(StatutMenage::ALL
        .iter()
        .map(|statut| StatutCount {
            statut_code: statut.code(),
            statut_nom: statut.label(),
            count: counts.get(&statut.code()).copied().unwrap_or(0),
        })
        .collect())
}

/// GET /stats/global/
pub async fn global_stats(State(state): State<AppState>) -> Result<Json<GlobalStats>, ApiError> {
    let attendus = count_attendus(&state.db).await?;
    let collectes = count_collectes(&state.db).await?;

    let taux_de_couverture = TauxCouverture {
        global: taux(collectes.total, attendus.total),
        rural: taux(collectes.rural, attendus.rural),
        urbain: taux(collectes.urbain, attendus.urbain),
    };

    let repartition = repartition_statuts(&state.db, None).await?;

    Ok(Json(GlobalStats {
        menages_attendus: attendus,
        menages_collectes: collectes,
        taux_de_couverture,
        repartition_statuts: repartition,
    }))
}

/// GET /stats/regions/
///
/// One entry per region, ordered by district code. Regions with no
/// households report zero counts and a zero ratio.
pub async fn region_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegionStats>>, ApiError> {
    let regions = sqlx::query_as::<_, Region>(
        "SELECT code_dr, nom_region FROM regions ORDER BY code_dr",
    )
    .fetch_all(&state.db)
    .await?;

    let mut stats = Vec::with_capacity(regions.len());
    for region in regions {
        let attendus: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menages WHERE code_dr = ? AND tirage = 1",
        )
        .bind(&region.code_dr)
        .fetch_one(&state.db)
        .await?;

        let collectes: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menages
             WHERE code_dr = ? AND statut_menage IN (?, ?)",
        )
        .bind(&region.code_dr)
        .bind(StatutMenage::Complet.code())
        .bind(StatutMenage::Partiel.code())
        .fetch_one(&state.db)
        .await?;

        let repartition = repartition_statuts(&state.db, Some(&region.code_dr)).await?;

        stats.push(RegionStats {
            code_dr: region.code_dr,
            nom_region: region.nom_region,
            menages_attendus: attendus,
            menages_collectes: collectes,
            taux_de_couverture: taux(collectes, attendus),
            repartition_statuts: repartition,
        });
    }

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::taux;

    #[test]
    fn taux_zero_denominator_is_zero() {
        assert_eq!(taux(0, 0), 0.0);
        assert_eq!(taux(5, 0), 0.0);
    }

    #[test]
    fn taux_rounds_to_two_decimals() {
        assert_eq!(taux(1, 2), 50.0);
        assert_eq!(taux(1, 3), 33.33);
        assert_eq!(taux(2, 3), 66.67);
        assert_eq!(taux(3, 3), 100.0);
    }
}
