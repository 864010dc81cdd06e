//! Import passes over the two CSV exports
//!
//! Run order:
//! 1. seed the static regions;
//! 2. personnel pass over INFO_GEN (superviseurs, enquêteurs);
//! 3. pass over INFO_MEN_RECORD (extra personnel + per-household cache);
//! 4. merge pass over INFO_GEN upserting one ménage per household id.
//!
//! The lookup tables built along the way are function-local and handed from
//! phase to phase. Writes are sequential with no wrapping transaction: an
//! abort leaves earlier phases committed.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use sqlx::SqlitePool;
use suivi_common::db::Menage;
use suivi_common::StatutMenage;
use tracing::{info, warn};

use crate::error::Result;
use crate::parse::{
    opt_text, parse_date_enquete, parse_entier, parse_heure, parse_tirage, region_is_rural,
    resolve_code_dr,
};
use crate::regions::{nom_region, seed_regions};
use crate::source::{load_records, Record};

/// Import run configuration
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// General enumeration export
    pub info_gen: PathBuf,
    /// Per-household record export
    pub info_men_record: PathBuf,
    /// Delete all existing rows before importing
    pub reset: bool,
}

/// Counters reported at the end of a run
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub superviseurs: usize,
    pub enqueteurs: usize,
    pub menages_importes: usize,
    pub menages_ignores: usize,
}

/// Per-household fields cached from INFO_MEN_RECORD, keyed by idmng.
#[derive(Debug, Default, Clone)]
struct MenRecord {
    hh_trimestre: String,
    superviseur_code: String,
    dr: String,
    cons: String,
    num_men: String,
    nom_cc: String,
    nom_cm: String,
    statut: String,
    tirage: String,
    adresse: String,
    telephone: String,
    owner_id: String,
}

/// Run a full import.
pub async fn run_import(pool: &SqlitePool, opts: &ImportOptions) -> Result<ImportSummary> {
    if opts.reset {
        reset_tables(pool).await?;
    }

    seed_regions(pool).await?;

    let mut superviseurs: HashSet<String> = HashSet::new();
    let mut enqueteurs: HashSet<String> = HashSet::new();

    info!("--- Lecture de {} (personnel) ---", opts.info_gen.display());
    let gen_rows = load_records(&opts.info_gen)?;
    import_personnel(pool, &gen_rows, &mut superviseurs, &mut enqueteurs).await?;
    info!("{} superviseurs traités", superviseurs.len());
    info!("{} enquêteurs traités", enqueteurs.len());

    info!(
        "--- Lecture de {} (ménages) ---",
        opts.info_men_record.display()
    );
    let men_records =
        load_men_records(pool, &opts.info_men_record, &mut superviseurs, &mut enqueteurs).await?;
    info!("{} entrées ménages en cache", men_records.len());

    info!(
        "--- Importation des ménages (source principale {}) ---",
        opts.info_gen.display()
    );
    let (importes, ignores) = import_menages(pool, &gen_rows, &men_records, &enqueteurs).await?;
    info!("{} ménages importés, {} ignorés", importes, ignores);

    Ok(ImportSummary {
        superviseurs: superviseurs.len(),
        enqueteurs: enqueteurs.len(),
        menages_importes: importes,
        menages_ignores: ignores,
    })
}

/// Delete all rows, children first so the foreign keys allow it.
async fn reset_tables(pool: &SqlitePool) -> Result<()> {
    warn!("Suppression des anciennes données (--reset)");
    for table in ["menages", "enqueteurs", "superviseurs", "regions"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn insert_superviseur(pool: &SqlitePool, id_superviseur: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO superviseurs (id_superviseur) VALUES (?)")
        .bind(id_superviseur)
        .execute(pool)
        .await?;
    Ok(())
}

/// get-or-create: an existing row keeps its name and supervisor.
async fn insert_enqueteur(
    pool: &SqlitePool,
    login_enq: &str,
    nom_enqueteur: &str,
    superviseur_id: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO enqueteurs (login_enq, nom_enqueteur, superviseur_id)
         VALUES (?, ?, ?)
         ON CONFLICT(login_enq) DO NOTHING",
    )
    .bind(login_enq)
    .bind(nom_enqueteur)
    .bind(superviseur_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Personnel pass over INFO_GEN: superviseurs from cp_superviseur,
/// enquêteurs from login_enq/nom_de_l_enqueteur.
async fn import_personnel(
    pool: &SqlitePool,
    gen_rows: &[Record],
    superviseurs: &mut HashSet<String>,
    enqueteurs: &mut HashSet<String>,
) -> Result<()> {
    for row in gen_rows {
        let id_superviseur = row.get("cp_superviseur");
        if !id_superviseur.is_empty() && superviseurs.insert(id_superviseur.to_string()) {
            insert_superviseur(pool, id_superviseur).await?;
        }

        let login_enq = row.get("login_enq");
        let nom_enqueteur = row.get("nom_de_l_enqueteur");
        if !login_enq.is_empty()
            && !nom_enqueteur.is_empty()
            && enqueteurs.insert(login_enq.to_string())
        {
            let superviseur = (!id_superviseur.is_empty()).then_some(id_superviseur);
            insert_enqueteur(pool, login_enq, nom_enqueteur, superviseur).await?;
        }
    }
    Ok(())
}

/// Pass over INFO_MEN_RECORD: supplementary personnel plus the per-household
/// field cache used by the merge pass.
async fn load_men_records(
    pool: &SqlitePool,
    path: &std::path::Path,
    superviseurs: &mut HashSet<String>,
    enqueteurs: &mut HashSet<String>,
) -> Result<HashMap<String, MenRecord>> {
    let mut cache: HashMap<String, MenRecord> = HashMap::new();

    for row in load_records(path)? {
        let idmng = row.get("idmng");
        if idmng.is_empty() {
            continue;
        }

        let superviseur_code = row.get("superviseur");
        if !superviseur_code.is_empty() && superviseurs.insert(superviseur_code.to_string()) {
            insert_superviseur(pool, superviseur_code).await?;
        }

        let owner_id = row.get("owner_id");
        let owner_name = row.get("owner_name");
        if !owner_id.is_empty() && enqueteurs.insert(owner_id.to_string()) {
            // owner_name can be blank; the login doubles as a display name then
            let nom = if owner_name.is_empty() { owner_id } else { owner_name };
            let superviseur = (!superviseur_code.is_empty()).then_some(superviseur_code);
            insert_enqueteur(pool, owner_id, nom, superviseur).await?;
        }

        cache.insert(
            idmng.to_string(),
            MenRecord {
                hh_trimestre: row.get("hh_trimestre").to_string(),
                superviseur_code: superviseur_code.to_string(),
                dr: row.get("dr").to_string(),
                cons: row.get("cons").to_string(),
                num_men: row.get("num_men").to_string(),
                nom_cc: row.get("nom_cc").to_string(),
                nom_cm: row.get("nom_du_cm").to_string(),
                statut: row.get("statut").to_string(),
                tirage: row.get("tirage").to_string(),
                adresse: row.get("ech_adresse").to_string(),
                telephone: row.get("ech_numero_telephone").to_string(),
                owner_id: owner_id.to_string(),
            },
        );
    }

    Ok(cache)
}

/// Merge pass: INFO_GEN is the authoritative source order; record-file fields
/// fill the gaps. Returns (imported, ignored) counts.
async fn import_menages(
    pool: &SqlitePool,
    gen_rows: &[Record],
    men_records: &HashMap<String, MenRecord>,
    enqueteurs: &HashSet<String>,
) -> Result<(usize, usize)> {
    let vide = MenRecord::default();
    let mut importes = 0usize;
    let mut ignores = 0usize;
    let mut deja_importes: HashSet<String> = HashSet::new();

    for row in gen_rows {
        let idmng = row.get("idmng");
        if idmng.is_empty() || deja_importes.contains(idmng) {
            continue;
        }

        let rec = men_records.get(idmng).unwrap_or(&vide);

        let Some(code_dr) = resolve_code_dr(&rec.dr, row.get("cp_grappe")) else {
            warn!("ménage {}: code DR non résolu, ligne ignorée", idmng);
            ignores += 1;
            continue;
        };
        let Some(nom_region) = nom_region(&code_dr) else {
            warn!("ménage {}: DR {} inconnu, ligne ignorée", idmng, code_dr);
            ignores += 1;
            continue;
        };

        // Enquêteur: general-file login first, else the record-file owner,
        // and only when known from the personnel passes
        let login_enq = [row.get("login_enq"), rec.owner_id.as_str()]
            .into_iter()
            .find(|login| !login.is_empty() && enqueteurs.contains(*login))
            .map(str::to_string);

        let statut_menage = StatutMenage::from_texte_csv(&rec.statut).code();
        let tirage = parse_tirage(&rec.tirage);

        let superviseur_code = {
            let gen = row.get("cp_superviseur");
            if gen.is_empty() { rec.superviseur_code.as_str() } else { gen }
        };

        let menage = Menage {
            idmng: idmng.to_string(),
            code_dr,
            superviseur_code: opt_text(superviseur_code),
            login_enq,
            hh_trimestre: opt_text(first_non_empty(row.get("cp_trimestre"), &rec.hh_trimestre)),
            cons_code: opt_text(first_non_empty(row.get("cp_cons"), &rec.cons)),
            num_men_csv: opt_text(first_non_empty(row.get("cp_men"), &rec.num_men)),
            nom_cc: opt_text(first_non_empty(row.get("cp_nom_cc"), &rec.nom_cc)),
            nom_cm: opt_text(first_non_empty(row.get("nom_cm"), &rec.nom_cm)),
            statut_menage,
            tirage: Some(tirage),
            adresse: opt_text(first_non_empty(
                &rec.adresse,
                row.first_of(&["adresse", "con_rost"]),
            )),
            telephone1: opt_text(first_non_empty(&rec.telephone, row.get("num_tel1"))),
            taille_men: Some(parse_entier(row.get("taille_men"), "taille_men", idmng)),
            nbr_eligible: Some(parse_entier(row.get("nbr_eligible"), "nbr_eligible", idmng)),
            date_enquete: parse_date_enquete(row.get("date_enq_human")),
            heure_debut_enquete: parse_heure(row.first_of(&["heur_debut", "heur_debistatut"])),
            heure_fin_enquete: parse_heure(row.get("heur_fin")),
            observations: opt_text(row.get("obs")),
            is_rural: region_is_rural(nom_region),
        };

        upsert_menage(pool, &menage).await?;
        deja_importes.insert(idmng.to_string());
        importes += 1;
    }

    Ok((importes, ignores))
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.trim().is_empty() { b } else { a }
}

/// Upsert by natural key: re-running on identical input changes nothing.
async fn upsert_menage(pool: &SqlitePool, menage: &Menage) -> Result<()> {
    sqlx::query(
        "INSERT INTO menages (
            idmng, code_dr, superviseur_code, login_enq,
            hh_trimestre, cons_code, num_men_csv, nom_cc, nom_cm,
            statut_menage, tirage, adresse, telephone1,
            taille_men, nbr_eligible,
            date_enquete, heure_debut_enquete, heure_fin_enquete,
            observations, is_rural
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(idmng) DO UPDATE SET
            code_dr = excluded.code_dr,
            superviseur_code = excluded.superviseur_code,
            login_enq = excluded.login_enq,
            hh_trimestre = excluded.hh_trimestre,
            cons_code = excluded.cons_code,
            num_men_csv = excluded.num_men_csv,
            nom_cc = excluded.nom_cc,
            nom_cm = excluded.nom_cm,
            statut_menage = excluded.statut_menage,
            tirage = excluded.tirage,
            adresse = excluded.adresse,
            telephone1 = excluded.telephone1,
            taille_men = excluded.taille_men,
            nbr_eligible = excluded.nbr_eligible,
            date_enquete = excluded.date_enquete,
            heure_debut_enquete = excluded.heure_debut_enquete,
            heure_fin_enquete = excluded.heure_fin_enquete,
            observations = excluded.observations,
            is_rural = excluded.is_rural",
    )
    .bind(&menage.idmng)
    .bind(&menage.code_dr)
    .bind(&menage.superviseur_code)
    .bind(&menage.login_enq)
    .bind(&menage.hh_trimestre)
    .bind(&menage.cons_code)
    .bind(&menage.num_men_csv)
    .bind(&menage.nom_cc)
    .bind(&menage.nom_cm)
    .bind(menage.statut_menage)
    .bind(menage.tirage)
    .bind(&menage.adresse)
    .bind(&menage.telephone1)
    .bind(menage.taille_men)
    .bind(menage.nbr_eligible)
    .bind(menage.date_enquete)
    .bind(menage.heure_debut_enquete)
    .bind(menage.heure_fin_enquete)
    .bind(&menage.observations)
    .bind(menage.is_rural)
    .execute(pool)
    .await?;

    Ok(())
}
