//! Ménage (household) endpoints
//!
//! Full CRUD. The list uses a lightweight projection and exact-match filters;
//! retrieve/create/update work with the full projection. Query-parameter
//! names (`region__code_dr`, `enqueteur__login_enq`, ...) are kept from the
//! historical REST surface so the existing dashboard keeps working.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use suivi_common::StatutMenage;

use crate::{
    api::ApiError,
    pagination::{paginate, Paginated},
    AppState,
};

/// Filterable query parameters for the ménage list
#[derive(Debug, Deserialize)]
pub struct MenageFilter {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Rows per page (default 10, max 100)
    pub page_size: Option<i64>,

    #[serde(rename = "region__code_dr")]
    pub region_code: Option<String>,

    pub statut_menage: Option<i64>,

    #[serde(rename = "enqueteur__login_enq")]
    pub login_enq: Option<String>,

    pub superviseur_code: Option<String>,

    pub is_rural: Option<bool>,

    pub tirage: Option<i64>,
}

fn default_page() -> i64 {
    1
}

/// Lightweight list projection (row as fetched)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MenageListRow {
    pub idmng: String,
    pub nom_cm: Option<String>,
    pub region_nom: String,
    pub statut_menage: i64,
    pub enqueteur_nom: Option<String>,
    pub date_enquete: Option<NaiveDate>,
}

/// Lightweight list projection (as serialized)
#[derive(Debug, Serialize)]
pub struct MenageListItem {
    pub idmng: String,
    pub nom_cm: Option<String>,
    pub region_nom: String,
    pub statut_menage: i64,
    pub statut_menage_display: &'static str,
    pub enqueteur_nom: Option<String>,
    pub date_enquete: Option<NaiveDate>,
}

impl From<MenageListRow> for MenageListItem {
    fn from(row: MenageListRow) -> Self {
        MenageListItem {
            statut_menage_display: StatutMenage::display(row.statut_menage),
            idmng: row.idmng,
            nom_cm: row.nom_cm,
            region_nom: row.region_nom,
            statut_menage: row.statut_menage,
            enqueteur_nom: row.enqueteur_nom,
            date_enquete: row.date_enquete,
        }
    }
}

/// SELECT clause of the lightweight projection, shared with /menages-details/
pub(crate) const LIST_SELECT: &str = "SELECT m.idmng, m.nom_cm, r.nom_region AS region_nom, \
     m.statut_menage, e.nom_enqueteur AS enqueteur_nom, m.date_enquete \
     FROM menages m \
     JOIN regions r ON r.code_dr = m.code_dr \
     LEFT JOIN enqueteurs e ON e.login_enq = m.login_enq";

/// Full projection for retrieve/create/update responses
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MenageDetail {
    pub idmng: String,
    #[serde(rename = "region")]
    pub code_dr: String,
    pub region_nom: String,
    pub superviseur_code: Option<String>,
    #[serde(rename = "enqueteur")]
    pub login_enq: Option<String>,
    pub enqueteur_nom: Option<String>,
    pub hh_trimestre: Option<String>,
    pub cons_code: Option<String>,
    pub num_men_csv: Option<String>,
    pub nom_cc: Option<String>,
    pub nom_cm: Option<String>,
    pub statut_menage: i64,
    pub tirage: Option<i64>,
    pub adresse: Option<String>,
    pub telephone1: Option<String>,
    pub taille_men: Option<i64>,
    pub nbr_eligible: Option<i64>,
    pub date_enquete: Option<NaiveDate>,
    pub heure_debut_enquete: Option<NaiveTime>,
    pub heure_fin_enquete: Option<NaiveTime>,
    pub observations: Option<String>,
    pub is_rural: bool,
}

/// Write payload for create/update
#[derive(Debug, Deserialize)]
pub struct MenageInput {
    /// Required on create; the path value wins on update
    pub idmng: Option<String>,
    #[serde(rename = "region")]
    pub code_dr: String,
    #[serde(rename = "enqueteur")]
    pub login_enq: Option<String>,
    pub superviseur_code: Option<String>,
    pub hh_trimestre: Option<String>,
    pub cons_code: Option<String>,
    pub num_men_csv: Option<String>,
    pub nom_cc: Option<String>,
    pub nom_cm: Option<String>,
    pub statut_menage: Option<i64>,
    pub tirage: Option<i64>,
    pub adresse: Option<String>,
    pub telephone1: Option<String>,
    pub taille_men: Option<i64>,
    pub nbr_eligible: Option<i64>,
    pub date_enquete: Option<NaiveDate>,
    pub heure_debut_enquete: Option<NaiveTime>,
    pub heure_fin_enquete: Option<NaiveTime>,
    pub observations: Option<String>,
    pub is_rural: Option<bool>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &MenageFilter) {
    if let Some(code) = &filter.region_code {
        qb.push(" AND m.code_dr = ").push_bind(code.clone());
    }
    if let Some(statut) = filter.statut_menage {
        qb.push(" AND m.statut_menage = ").push_bind(statut);
    }
    if let Some(login) = &filter.login_enq {
        qb.push(" AND m.login_enq = ").push_bind(login.clone());
    }
    if let Some(code) = &filter.superviseur_code {
        qb.push(" AND m.superviseur_code = ").push_bind(code.clone());
    }
    if let Some(rural) = filter.is_rural {
        qb.push(" AND m.is_rural = ").push_bind(rural);
    }
    if let Some(tirage) = filter.tirage {
        qb.push(" AND m.tirage = ").push_bind(tirage);
    }
}

/// Count + page query for the lightweight projection, shared with
/// /menages-details/.
pub(crate) async fn fetch_liste(
    db: &SqlitePool,
    filter: &MenageFilter,
) -> Result<Paginated<MenageListItem>, ApiError> {
    let mut count_qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM menages m WHERE 1=1");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

    let p = paginate(total, filter.page, filter.page_size);

    let mut list_qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(LIST_SELECT);
    list_qb.push(" WHERE 1=1");
    push_filters(&mut list_qb, filter);
    list_qb.push(" ORDER BY m.idmng LIMIT ");
    list_qb.push_bind(p.page_size);
    list_qb.push(" OFFSET ");
    list_qb.push_bind(p.offset);

    let rows: Vec<MenageListRow> = list_qb.build_query_as().fetch_all(db).await?;
    let items = rows.into_iter().map(MenageListItem::from).collect();

    Ok(Paginated::new(total, p, items))
}

/// GET /menages/
///
/// Paginated lightweight listing ordered by idmng, with exact-match filters.
pub async fn list_menages(
    State(state): State<AppState>,
    Query(filter): Query<MenageFilter>,
) -> Result<Json<Paginated<MenageListItem>>, ApiError> {
    Ok(Json(fetch_liste(&state.db, &filter).await?))
}

async fn fetch_detail(db: &SqlitePool, idmng: &str) -> Result<Option<MenageDetail>, sqlx::Error> {
    sqlx::query_as::<_, MenageDetail>(
        "SELECT m.idmng, m.code_dr, r.nom_region AS region_nom, m.superviseur_code,
                m.login_enq, e.nom_enqueteur AS enqueteur_nom,
                m.hh_trimestre, m.cons_code, m.num_men_csv, m.nom_cc, m.nom_cm,
                m.statut_menage, m.tirage, m.adresse, m.telephone1,
                m.taille_men, m.nbr_eligible,
                m.date_enquete, m.heure_debut_enquete, m.heure_fin_enquete,
                m.observations, m.is_rural
         FROM menages m
         JOIN regions r ON r.code_dr = m.code_dr
         LEFT JOIN enqueteurs e ON e.login_enq = m.login_enq
         WHERE m.idmng = ?",
    )
    .bind(idmng)
    .fetch_optional(db)
    .await
}

/// GET /menages/:idmng
pub async fn get_menage(
    State(state): State<AppState>,
    Path(idmng): Path<String>,
) -> Result<Json<MenageDetail>, ApiError> {
    let detail = fetch_detail(&state.db, &idmng)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ménage {}", idmng)))?;

    Ok(Json(detail))
}

/// Validate foreign keys and status code of a write payload
async fn validate_input(db: &SqlitePool, input: &MenageInput) -> Result<(), ApiError> {
    let region_exists: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM regions WHERE code_dr = ?")
            .bind(&input.code_dr)
            .fetch_optional(db)
            .await?;
    if region_exists.is_none() {
        return Err(ApiError::BadRequest(format!(
            "unknown region {}",
            input.code_dr
        )));
    }

    if let Some(login) = &input.login_enq {
        let enq_exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM enqueteurs WHERE login_enq = ?")
                .bind(login)
                .fetch_optional(db)
                .await?;
        if enq_exists.is_none() {
            return Err(ApiError::BadRequest(format!("unknown enquêteur {}", login)));
        }
    }

    if let Some(code) = input.statut_menage {
        if StatutMenage::from_code(code).is_none() {
            return Err(ApiError::BadRequest(format!(
                "unknown statut_menage code {}",
                code
            )));
        }
    }

    Ok(())
}

/// POST /menages/
pub async fn create_menage(
    State(state): State<AppState>,
    Json(input): Json<MenageInput>,
) -> Result<(StatusCode, Json<MenageDetail>), ApiError> {
    let idmng = input
        .idmng
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("idmng is required".to_string()))?
        .to_string();

    validate_input(&state.db, &input).await?;

    if fetch_detail(&state.db, &idmng).await?.is_some() {
        return Err(ApiError::Conflict(format!("ménage {} already exists", idmng)));
    }

    sqlx::query(
        "INSERT INTO menages (
            idmng, code_dr, superviseur_code, login_enq,
            hh_trimestre, cons_code, num_men_csv, nom_cc, nom_cm,
            statut_menage, tirage, adresse, telephone1,
            taille_men, nbr_eligible,
            date_enquete, heure_debut_enquete, heure_fin_enquete,
            observations, is_rural
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&idmng)
    .bind(&input.code_dr)
    .bind(&input.superviseur_code)
    .bind(&input.login_enq)
    .bind(&input.hh_trimestre)
    .bind(&input.cons_code)
    .bind(&input.num_men_csv)
    .bind(&input.nom_cc)
    .bind(&input.nom_cm)
    .bind(input.statut_menage.unwrap_or(StatutMenage::NonAffecte.code()))
    .bind(input.tirage)
    .bind(&input.adresse)
    .bind(&input.telephone1)
    .bind(input.taille_men)
    .bind(input.nbr_eligible)
    .bind(input.date_enquete)
    .bind(input.heure_debut_enquete)
    .bind(input.heure_fin_enquete)
    .bind(&input.observations)
    .bind(input.is_rural.unwrap_or(false))
    .execute(&state.db)
    .await?;

    let detail = fetch_detail(&state.db, &idmng)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ménage {}", idmng)))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /menages/:idmng
pub async fn update_menage(
    State(state): State<AppState>,
    Path(idmng): Path<String>,
    Json(input): Json<MenageInput>,
) -> Result<Json<MenageDetail>, ApiError> {
    validate_input(&state.db, &input).await?;

    let result = sqlx::query(
        "UPDATE menages SET
            code_dr = ?, superviseur_code = ?, login_enq = ?,
            hh_trimestre = ?, cons_code = ?, num_men_csv = ?, nom_cc = ?, nom_cm = ?,
            statut_menage = ?, tirage = ?, adresse = ?, telephone1 = ?,
            taille_men = ?, nbr_eligible = ?,
            date_enquete = ?, heure_debut_enquete = ?, heure_fin_enquete = ?,
            observations = ?, is_rural = ?
         WHERE idmng = ?",
    )
    .bind(&input.code_dr)
    .bind(&input.superviseur_code)
    .bind(&input.login_enq)
    .bind(&input.hh_trimestre)
    .bind(&input.cons_code)
    .bind(&input.num_men_csv)
    .bind(&input.nom_cc)
    .bind(&input.nom_cm)
    .bind(input.statut_menage.unwrap_or(StatutMenage::NonAffecte.code()))
    .bind(input.tirage)
    .bind(&input.adresse)
    .bind(&input.telephone1)
    .bind(input.taille_men)
    .bind(input.nbr_eligible)
    .bind(input.date_enquete)
    .bind(input.heure_debut_enquete)
    .bind(input.heure_fin_enquete)
    .bind(&input.observations)
    .bind(input.is_rural.unwrap_or(false))
    .bind(&idmng)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("ménage {}", idmng)));
    }

    let detail = fetch_detail(&state.db, &idmng)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("ménage {}", idmng)))?;

    Ok(Json(detail))
}

/// DELETE /menages/:idmng
pub async fn delete_menage(
    State(state): State<AppState>,
    Path(idmng): Path<String>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM menages WHERE idmng = ?")
        .bind(&idmng)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("ménage {}", idmng)));
    }

    Ok(StatusCode::NO_CONTENT)
}
