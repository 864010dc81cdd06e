//! Database row models
//!
//! Natural string primary keys throughout (idmng, code_dr, login_enq,
//! id_superviseur come straight from the CSV exports).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Census district (DR). Immutable reference data seeded by the importer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Region {
    pub code_dr: String,
    pub nom_region: String,
}

/// Field enumerator, optionally attached to a supervisor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enqueteur {
    pub login_enq: String,
    pub nom_enqueteur: String,
    pub superviseur_id: Option<String>,
}

/// A household row, exactly as stored in `menages`.
///
/// `statut_menage` holds a [`crate::StatutMenage`] code; `is_rural` is derived
/// from the region at import time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menage {
    pub idmng: String,
    pub code_dr: String,
    pub superviseur_code: Option<String>,
    pub login_enq: Option<String>,
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
