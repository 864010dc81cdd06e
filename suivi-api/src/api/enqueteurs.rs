//! Enquêteur endpoints
//!
//! Read-only: enquêteurs are created by the importer, never through the API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use suivi_common::db::Enqueteur;

use crate::{
    api::ApiError,
    pagination::{paginate, Paginated},
    AppState,
};

/// Query parameters for the enquêteur list
#[derive(Debug, Deserialize)]
pub struct EnqueteurQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Rows per page (default 10, max 100)
    pub page_size: Option<i64>,

    /// Restrict to one supervisor's team
    pub superviseur_id: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// GET /enqueteurs/
///
/// Paginated list ordered by name, optionally filtered by supervisor.
pub async fn list_enqueteurs(
    State(state): State<AppState>,
    Query(query): Query<EnqueteurQuery>,
) -> Result<Json<Paginated<Enqueteur>>, ApiError> {
    let mut count_sql = String::from("SELECT COUNT(*) FROM enqueteurs");
    let mut list_sql = String::from(
        "SELECT login_enq, nom_enqueteur, superviseur_id FROM enqueteurs",
    );
    if query.superviseur_id.is_some() {
        count_sql.push_str(" WHERE superviseur_id = ?");
        list_sql.push_str(" WHERE superviseur_id = ?");
    }
    list_sql.push_str(" ORDER BY nom_enqueteur LIMIT ? OFFSET ?");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(sup) = &query.superviseur_id {
        count_query = count_query.bind(sup);
    }
    let total: i64 = count_query.fetch_one(&state.db).await?;

    let p = paginate(total, query.page, query.page_size);

    let mut list_query = sqlx::query_as::<_, Enqueteur>(&list_sql);
    if let Some(sup) = &query.superviseur_id {
        list_query = list_query.bind(sup);
    }
    let rows = list_query
        .bind(p.page_size)
        .bind(p.offset)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(Paginated::new(total, p, rows)))
}

/// GET /enqueteurs/:login_enq
pub async fn get_enqueteur(
    State(state): State<AppState>,
    Path(login_enq): Path<String>,
) -> Result<Json<Enqueteur>, ApiError> {
    let enqueteur = sqlx::query_as::<_, Enqueteur>(
        "SELECT login_enq, nom_enqueteur, superviseur_id FROM enqueteurs WHERE login_enq = ?",
    )
    .bind(&login_enq)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("enquêteur {}", login_enq)))?;

    Ok(Json(enqueteur))
}
