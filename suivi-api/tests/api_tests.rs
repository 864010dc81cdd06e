//! Integration tests for suivi-api endpoints
//!
//! Each test builds the real router over a fresh in-memory database with
//! hand-inserted fixtures, then drives it with tower's `oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use suivi_api::{build_router, AppState};
use suivi_common::db::init_in_memory;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: fresh in-memory database with the schema applied
async fn setup_db() -> SqlitePool {
    init_in_memory().await.expect("in-memory database")
}

/// Test helper: router over a given pool
fn setup_app(db: SqlitePool) -> axum::Router {
    build_router(AppState::new(db))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Two regions (one urban, one rural), a supervisor, two enquêteurs and four
/// households covering the interesting statut/tirage combinations.
async fn seed_fixtures(db: &SqlitePool) {
    sqlx::query("INSERT INTO regions (code_dr, nom_region) VALUES ('01', 'DAKAR'), ('10', 'KOLDA')")
        .execute(db)
        .await
        .unwrap();
    sqlx::query("INSERT INTO superviseurs (id_superviseur) VALUES ('SP01')")
        .execute(db)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO enqueteurs (login_enq, nom_enqueteur, superviseur_id)
         VALUES ('aba', 'Awa Ba', 'SP01'), ('bineta', 'Bineta Ndao', NULL)",
    )
    .execute(db)
    .await
    .unwrap();

    // (idmng, region, statut, tirage, rural, enquêteur)
    let menages = [
        ("M01", "01", 4, 1, false, Some("aba")),
        ("M02", "01", 2, 1, false, None),
        ("M03", "10", 3, 1, true, Some("bineta")),
        ("M04", "10", 9, 0, true, None),
    ];
    for (idmng, code_dr, statut, tirage, rural, login) in menages {
        sqlx::query(
            "INSERT INTO menages (idmng, code_dr, statut_menage, tirage, is_rural, login_enq, nom_cm, date_enquete)
             VALUES (?, ?, ?, ?, ?, ?, 'Diop', '2023-05-14')",
        )
        .bind(idmng)
        .bind(code_dr)
        .bind(statut)
        .bind(tirage)
        .bind(rural)
        .bind(login)
        .execute(db)
        .await
        .unwrap();
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_db().await);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "suivi-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Regions
// =============================================================================

#[tokio::test]
async fn test_regions_list_unpaginated_and_ordered() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app.oneshot(get_request("/regions/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // Plain array, no pagination envelope
    let regions = body.as_array().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0]["code_dr"], "01");
    assert_eq!(regions[1]["code_dr"], "10");
}

#[tokio::test]
async fn test_region_not_found() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app.oneshot(get_request("/regions/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("99"));
}

// =============================================================================
// Enquêteurs
// =============================================================================

#[tokio::test]
async fn test_enqueteurs_filter_by_superviseur() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(get_request("/enqueteurs/?superviseur_id=SP01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["login_enq"], "aba");
    assert_eq!(body["results"][0]["superviseur_id"], "SP01");
}

#[tokio::test]
async fn test_enqueteur_retrieve() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app.oneshot(get_request("/enqueteurs/bineta")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["nom_enqueteur"], "Bineta Ndao");
    assert_eq!(body["superviseur_id"], Value::Null);
}

// =============================================================================
// Ménages: listing, filters, pagination
// =============================================================================

#[tokio::test]
async fn test_menages_list_projection() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app.oneshot(get_request("/menages/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["page_size"], 10);

    let first = &body["results"][0];
    assert_eq!(first["idmng"], "M01");
    assert_eq!(first["region_nom"], "DAKAR");
    assert_eq!(first["statut_menage_display"], "COMPLET");
    assert_eq!(first["enqueteur_nom"], "Awa Ba");
    assert_eq!(first["date_enquete"], "2023-05-14");
}

#[tokio::test]
async fn test_menages_filter_region_and_statut() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(get_request("/menages/?region__code_dr=01&statut_menage=4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["idmng"], "M01");
}

#[tokio::test]
async fn test_menages_filter_rural_and_tirage() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(get_request("/menages/?is_rural=true&tirage=1"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["idmng"], "M03");
}

#[tokio::test]
async fn test_menages_default_pagination() {
    let db = setup_db().await;
    sqlx::query("INSERT INTO regions (code_dr, nom_region) VALUES ('01', 'DAKAR')")
        .execute(&db)
        .await
        .unwrap();
    for i in 0..12 {
        sqlx::query("INSERT INTO menages (idmng, code_dr) VALUES (?, '01')")
            .bind(format!("M{:02}", i))
            .execute(&db)
            .await
            .unwrap();
    }
    let app = setup_app(db);

    let response = app.clone().oneshot(get_request("/menages/")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 12);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 10);

    let response = app.oneshot(get_request("/menages/?page=2")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_menages_page_size_override() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(get_request("/menages/?page_size=2"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Ménages: CRUD
// =============================================================================

fn menage_payload(idmng: &str) -> Value {
    json!({
        "idmng": idmng,
        "region": "01",
        "enqueteur": "aba",
        "nom_cm": "Sarr",
        "statut_menage": 2,
        "tirage": 1,
        "taille_men": 6,
        "date_enquete": "2023-06-01",
        "heure_debut_enquete": "09:30:00"
    })
}

#[tokio::test]
async fn test_menage_crud_cycle() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    // Create
    let response = app
        .clone()
        .oneshot(json_request("POST", "/menages/", menage_payload("M99")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["idmng"], "M99");
    assert_eq!(body["region"], "01");
    assert_eq!(body["region_nom"], "DAKAR");
    assert_eq!(body["enqueteur_nom"], "Awa Ba");

    // Retrieve
    let response = app.clone().oneshot(get_request("/menages/M99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Update to complete
    let mut update = menage_payload("M99");
    update["statut_menage"] = json!(4);
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/menages/M99", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["statut_menage"], 4);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/menages/M99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let response = app.oneshot(get_request("/menages/M99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_menage_create_unknown_region_rejected() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let mut payload = menage_payload("M98");
    payload["region"] = json!("99");
    let response = app
        .oneshot(json_request("POST", "/menages/", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("region"));
}

#[tokio::test]
async fn test_menage_create_invalid_statut_rejected() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let mut payload = menage_payload("M98");
    payload["statut_menage"] = json!(5); // 5 is not one of the 7 codes
    let response = app
        .oneshot(json_request("POST", "/menages/", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_menage_create_duplicate_conflicts() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(json_request("POST", "/menages/", menage_payload("M01")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_menage_update_missing_is_not_found() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .oneshot(json_request("PUT", "/menages/ABSENT", menage_payload("ABSENT")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Statistics
// =============================================================================

#[tokio::test]
async fn test_global_stats_empty_database() {
    let app = setup_app(setup_db().await);

    let response = app.oneshot(get_request("/stats/global/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["menages_attendus"]["total"], 0);
    assert_eq!(body["menages_collectes"]["total"], 0);
    // Zero-guarded ratios, never a division error
    assert_eq!(body["taux_de_couverture"]["global"], 0.0);
    assert_eq!(body["taux_de_couverture"]["rural"], 0.0);
    assert_eq!(body["taux_de_couverture"]["urbain"], 0.0);

    // Histogram still has all 7 codes
    let repartition = body["repartition_statuts"].as_array().unwrap();
    assert_eq!(repartition.len(), 7);
    for entry in repartition {
        assert_eq!(entry["count"], 0);
    }
}

#[tokio::test]
async fn test_global_stats_values() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app.oneshot(get_request("/stats/global/")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    // M01, M02, M03 are selected; M01 (complet) and M03 (partiel) collected
    assert_eq!(body["menages_attendus"]["total"], 3);
    assert_eq!(body["menages_attendus"]["rural"], 1);
    assert_eq!(body["menages_attendus"]["urbain"], 2);
    assert_eq!(body["menages_collectes"]["total"], 2);
    assert_eq!(body["menages_collectes"]["rural"], 1);
    assert_eq!(body["menages_collectes"]["urbain"], 1);

    assert_eq!(body["taux_de_couverture"]["global"], 66.67);
    assert_eq!(body["taux_de_couverture"]["rural"], 100.0);
    assert_eq!(body["taux_de_couverture"]["urbain"], 50.0);

    let repartition = body["repartition_statuts"].as_array().unwrap();
    assert_eq!(repartition.len(), 7);
    let codes: Vec<i64> = repartition
        .iter()
        .map(|e| e["statut_code"].as_i64().unwrap())
        .collect();
    assert_eq!(codes, vec![1, 2, 3, 4, 7, 8, 9]);
    assert_eq!(repartition[1]["count"], 1); // affecté: M02
    assert_eq!(repartition[3]["count"], 1); // complet: M01
    assert_eq!(repartition[4]["count"], 0); // n'existe plus: none
    assert_eq!(repartition[6]["count"], 1); // refus: M04
}

#[tokio::test]
async fn test_region_stats_ordered_with_zero_guard() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    // A third region with no households at all
    sqlx::query("INSERT INTO regions (code_dr, nom_region) VALUES ('14', 'SEDHIOU')")
        .execute(&db)
        .await
        .unwrap();
    let app = setup_app(db);

    let response = app.oneshot(get_request("/stats/regions/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let regions = body.as_array().unwrap();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0]["code_dr"], "01");
    assert_eq!(regions[1]["code_dr"], "10");
    assert_eq!(regions[2]["code_dr"], "14");

    // Region 01: M01 + M02 selected, M01 collected
    assert_eq!(regions[0]["menages_attendus"], 2);
    assert_eq!(regions[0]["menages_collectes"], 1);
    assert_eq!(regions[0]["taux_de_couverture"], 50.0);

    // Region 10: M03 selected and collected
    assert_eq!(regions[1]["menages_attendus"], 1);
    assert_eq!(regions[1]["menages_collectes"], 1);
    assert_eq!(regions[1]["taux_de_couverture"], 100.0);

    // Empty region: zero counts, zero-guarded ratio, full histogram
    assert_eq!(regions[2]["menages_attendus"], 0);
    assert_eq!(regions[2]["taux_de_couverture"], 0.0);
    assert_eq!(regions[2]["repartition_statuts"].as_array().unwrap().len(), 7);
}

// =============================================================================
// Household details listing
// =============================================================================

#[tokio::test]
async fn test_menages_details_filters() {
    let db = setup_db().await;
    seed_fixtures(&db).await;
    let app = setup_app(db);

    let response = app
        .clone()
        .oneshot(get_request("/menages-details/?region__code_dr=10&statut_menage=3"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["idmng"], "M03");

    // Non-integer statut is silently ignored, not an error
    let response = app
        .oneshot(get_request("/menages-details/?statut_menage=complet"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 4);
}
