//! Region (DR) endpoints
//!
//! Read-only reference data; the list is short (14 districts) so it is
//! deliberately not paginated.

use axum::{
    extract::{Path, State},
    Json,
};
use suivi_common::db::Region;

use crate::{api::ApiError, AppState};

/// GET /regions/
///
/// Full region list ordered by district code. Not paginated.
pub async fn list_regions(State(state): State<AppState>) -> Result<Json<Vec<Region>>, ApiError> {
    let regions = sqlx::query_as::<_, Region>(
        "SELECT code_dr, nom_region FROM regions ORDER BY code_dr",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(regions))
}

/// GET /regions/:code_dr
pub async fn get_region(
    State(state): State<AppState>,
    Path(code_dr): Path<String>,
) -> Result<Json<Region>, ApiError> {
    let region = sqlx::query_as::<_, Region>(
        "SELECT code_dr, nom_region FROM regions WHERE code_dr = ?",
    )
    .bind(&code_dr)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("region {}", code_dr)))?;

    Ok(Json(region))
}
