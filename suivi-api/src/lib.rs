//! suivi-api library - REST service for survey field monitoring
//!
//! CRUD over the household tables plus read-only coverage statistics,
//! aggregated on demand from the current table state.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// CORS is permissive: the monitoring dashboard is served from another origin.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/regions/", get(api::list_regions))
        .route("/regions/:code_dr", get(api::get_region))
        .route("/enqueteurs/", get(api::list_enqueteurs))
        .route("/enqueteurs/:login_enq", get(api::get_enqueteur))
        .route(
            "/menages/",
            get(api::list_menages).post(api::create_menage),
        )
        .route(
            "/menages/:idmng",
            get(api::get_menage)
                .put(api::update_menage)
                .delete(api::delete_menage),
        )
        .route("/stats/global/", get(api::global_stats))
        .route("/stats/regions/", get(api::region_stats))
        .route("/menages-details/", get(api::menages_details))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
