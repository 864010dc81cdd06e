//! Field parsing and derivation rules
//!
//! The per-row heuristics applied when merging the two exports: district-code
//! resolution, tirage flag, date/time parsing, lenient integer parsing.

use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

/// Resolve the 2-digit district code of a household.
///
/// The per-household export's DR column wins when it has at least two
/// characters; otherwise the general export's grappe code is used. The first
/// two characters are taken, surrounding quotes/spaces stripped, and a single
/// digit is left-zero-padded. Returns `None` when neither source yields a
/// 2-digit numeric code.
pub fn resolve_code_dr(dr_men_record: &str, grappe: &str) -> Option<String> {
    let candidate = [dr_men_record, grappe]
        .into_iter()
        .map(str::trim)
        .find(|value| value.chars().count() >= 2)?;

    let prefix: String = candidate.chars().take(2).collect();
    let cleaned = prefix.trim_matches(|c: char| matches!(c, '\'' | '"' | ' '));

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match cleaned.len() {
        1 => Some(format!("0{}", cleaned)),
        2 => Some(cleaned.to_string()),
        _ => None,
    }
}

/// Selected-for-survey flag from the free-text tirage column.
///
/// Numeric exports carry 0/1 directly; textual exports mark selected
/// households as "Tiré" and substitutes as "Remplaçant".
pub fn parse_tirage(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return if n != 0 { 1 } else { 0 };
    }
    let lower = raw.to_lowercase();
    if lower.contains("tiré")
        || lower.contains("tire")
        || lower.contains("remplaçant")
        || lower.contains("remplacant")
    {
        1
    } else {
        0
    }
}

/// Interview date from the `date_enq_human` column; blank or malformed -> None.
pub fn parse_date_enquete(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Interview time; accepts HH:MM:SS and HH:MM, blank or malformed -> None.
pub fn parse_heure(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Lenient integer parse for taille_men/nbr_eligible.
///
/// Blank is a plain 0; non-blank garbage also defaults to 0 but is worth a
/// warning since it points at a broken export column.
pub fn parse_entier(raw: &str, column: &str, idmng: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            warn!("ménage {}: valeur {} invalide pour {}, 0 utilisé", idmng, raw, column);
            0
        }
    }
}

/// Rural flag derived from the region: everything outside the DAKAR and
/// THIES districts is rural.
pub fn region_is_rural(nom_region: &str) -> bool {
    !matches!(nom_region.trim().to_uppercase().as_str(), "DAKAR" | "THIES")
}

/// Empty-to-None conversion for optional text columns.
pub fn opt_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
