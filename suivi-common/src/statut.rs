//! Household status codes
//!
//! The seven statut_menage codes used across the survey, with the textual
//! status mapping applied when importing INFO_MEN_RECORD.

/// Collection status of a household, as stored in `menages.statut_menage`.
///
/// Code values are fixed by the historical CSV exports and must not be
/// renumbered (7/8/9 are not contiguous with 1-4 on purpose).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatutMenage {
    NonAffecte,
    Affecte,
    Partiel,
    Complet,
    NExistePlus,
    Demenage,
    Refus,
}

impl StatutMenage {
    /// All statuses, in ascending code order.
    pub const ALL: [StatutMenage; 7] = [
        StatutMenage::NonAffecte,
        StatutMenage::Affecte,
        StatutMenage::Partiel,
        StatutMenage::Complet,
        StatutMenage::NExistePlus,
        StatutMenage::Demenage,
        StatutMenage::Refus,
    ];

    /// Numeric code stored in the database.
    pub fn code(self) -> i64 {
        match self {
            StatutMenage::NonAffecte => 1,
            StatutMenage::Affecte => 2,
            StatutMenage::Partiel => 3,
            StatutMenage::Complet => 4,
            StatutMenage::NExistePlus => 7,
            StatutMenage::Demenage => 8,
            StatutMenage::Refus => 9,
        }
    }

    /// Reverse of [`code`](Self::code); `None` for unknown codes.
    pub fn from_code(code: i64) -> Option<StatutMenage> {
        match code {
            1 => Some(StatutMenage::NonAffecte),
            2 => Some(StatutMenage::Affecte),
            3 => Some(StatutMenage::Partiel),
            4 => Some(StatutMenage::Complet),
            7 => Some(StatutMenage::NExistePlus),
            8 => Some(StatutMenage::Demenage),
            9 => Some(StatutMenage::Refus),
            _ => None,
        }
    }

    /// Human-readable label, as shown by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            StatutMenage::NonAffecte => "NON AFFECTE",
            StatutMenage::Affecte => "AFFECTE",
            StatutMenage::Partiel => "PARTIEL",
            StatutMenage::Complet => "COMPLET",
            StatutMenage::NExistePlus => "N'existe plus",
            StatutMenage::Demenage => "Déménagé",
            StatutMenage::Refus => "Refus",
        }
    }

    /// Label for a raw database code; empty string for unknown codes.
    pub fn display(code: i64) -> &'static str {
        Self::from_code(code).map(StatutMenage::label).unwrap_or("")
    }

    /// Map the free-text `STATUT` column of INFO_MEN_RECORD to a status.
    ///
    /// Matching is case-insensitive. COMPLET/PARTIEL/REFUS and NON AFFECTE
    /// (with or without accent) match exactly; "existe plus" and
    /// "déménagé"/"demenage" match as substrings. Blank or unrecognized text
    /// means the household was handed to an enquêteur but not yet visited,
    /// hence Affecte.
    pub fn from_texte_csv(texte: &str) -> StatutMenage {
        let texte = texte.trim().to_uppercase();
        if texte.is_empty() {
            return StatutMenage::Affecte;
        }
        match texte.as_str() {
            "COMPLET" => StatutMenage::Complet,
            "PARTIEL" => StatutMenage::Partiel,
            "REFUS" => StatutMenage::Refus,
            "NON AFFECTE" | "NON AFFECTÉ" => StatutMenage::NonAffecte,
            _ if texte.contains("EXISTE PLUS") => StatutMenage::NExistePlus,
            _ if texte.contains("DEMENAGE") || texte.contains("DÉMÉNAGÉ") => {
                StatutMenage::Demenage
            }
            _ => StatutMenage::Affecte,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for statut in StatutMenage::ALL {
            assert_eq!(StatutMenage::from_code(statut.code()), Some(statut));
        }
        assert_eq!(StatutMenage::from_code(5), None);
        assert_eq!(StatutMenage::from_code(0), None);
    }

    #[test]
    fn all_is_sorted_by_code() {
        let codes: Vec<i64> = StatutMenage::ALL.iter().map(|s| s.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.len(), 7);
    }

    #[test]
    fn texte_exact_matches() {
        assert_eq!(StatutMenage::from_texte_csv("COMPLET"), StatutMenage::Complet);
        assert_eq!(StatutMenage::from_texte_csv("complet"), StatutMenage::Complet);
        assert_eq!(StatutMenage::from_texte_csv("  Partiel "), StatutMenage::Partiel);
        assert_eq!(StatutMenage::from_texte_csv("REFUS"), StatutMenage::Refus);
        assert_eq!(StatutMenage::from_texte_csv("NON AFFECTÉ"), StatutMenage::NonAffecte);
        assert_eq!(StatutMenage::from_texte_csv("non affecte"), StatutMenage::NonAffecte);
    }

    #[test]
    fn texte_substring_matches() {
        assert_eq!(
            StatutMenage::from_texte_csv("N'EXISTE PLUS"),
            StatutMenage::NExistePlus
        );
        assert_eq!(
            StatutMenage::from_texte_csv("le ménage n'existe plus"),
            StatutMenage::NExistePlus
        );
        assert_eq!(StatutMenage::from_texte_csv("Déménagé"), StatutMenage::Demenage);
        assert_eq!(StatutMenage::from_texte_csv("DEMENAGE"), StatutMenage::Demenage);
    }

    #[test]
    fn texte_blank_or_unknown_defaults_to_affecte() {
        assert_eq!(StatutMenage::from_texte_csv(""), StatutMenage::Affecte);
        assert_eq!(StatutMenage::from_texte_csv("   "), StatutMenage::Affecte);
        assert_eq!(StatutMenage::from_texte_csv("EN COURS"), StatutMenage::Affecte);
    }

    #[test]
    fn display_for_unknown_code_is_empty() {
        assert_eq!(StatutMenage::display(4), "COMPLET");
        assert_eq!(StatutMenage::display(42), "");
    }
}
