//! Filtered household listing for the dashboard drill-down
//!
//! Same lightweight projection as /menages/, but only the two dashboard
//! filters, and a lenient statut parameter: a non-integer value is silently
//! ignored rather than rejected.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::menages::{fetch_liste, MenageFilter, MenageListItem},
    api::ApiError,
    pagination::Paginated,
    AppState,
};

/// Query parameters for /menages-details/
#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Rows per page (default 10, max 100)
    pub page_size: Option<i64>,

    #[serde(rename = "region__code_dr")]
    pub region_code: Option<String>,

    /// Status code as free text; ignored when not an integer
    pub statut_menage: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// GET /menages-details/
pub async fn menages_details(
    State(state): State<AppState>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<Paginated<MenageListItem>>, ApiError> {
    let statut = query
        .statut_menage
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok());

    let filter = MenageFilter {
        page: query.page,
        page_size: query.page_size,
        region_code: query.region_code,
        statut_menage: statut,
        login_enq: None,
        superviseur_code: None,
        is_rural: None,
        tirage: None,
    };

    Ok(Json(fetch_liste(&state.db, &filter).await?))
}
