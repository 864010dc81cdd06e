//! CSV source loading
//!
//! The two known export variants differ in delimiter (comma vs semicolon) and
//! header casing (snake_case vs CAPITALIZED). Both are accepted: the
//! delimiter is sniffed from the header line, headers are lowercased, and a
//! leading UTF-8 byte-order mark is stripped.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ImportError, Result};

/// One CSV row, keyed by lowercased header name, values trimmed.
#[derive(Debug, Clone)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Value of a column, or "" if the column is absent or blank.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// First non-empty value among several columns (coalescing helper).
    pub fn first_of(&self, keys: &[&str]) -> &str {
        keys.iter()
            .map(|key| self.get(key))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

/// Load a whole CSV export into memory.
///
/// The files are batch exports of at most a few hundred thousand short rows,
/// so full materialization is fine and lets the final pass re-iterate rows
/// already read for the personnel pass.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let raw = std::fs::read_to_string(path)?;
    let content = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let delimiter = sniff_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ImportError::MissingHeaders(path.display().to_string()));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();
        records.push(Record { fields });
    }

    Ok(records)
}

/// Semicolon-delimited export if the header line contains one, else comma.
fn sniff_delimiter(content: &str) -> u8 {
    let header_line = content.lines().next().unwrap_or("");
    if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn comma_lowercase_variant() {
        let file = write_csv("idmng,login_enq\n0101001, aba \n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("idmng"), "0101001");
        assert_eq!(records[0].get("login_enq"), "aba");
    }

    #[test]
    fn semicolon_capitalized_variant() {
        let file = write_csv("IDMNG;LOGIN_ENQ\n0101001;aba\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("idmng"), "0101001");
        assert_eq!(records[0].get("login_enq"), "aba");
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let file = write_csv("\u{feff}idmng,statut\n0101001,COMPLET\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].get("idmng"), "0101001");
    }

    #[test]
    fn absent_column_reads_empty() {
        let file = write_csv("idmng\n0101001\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].get("statut"), "");
    }

    #[test]
    fn short_row_is_tolerated() {
        let file = write_csv("idmng,statut,tirage\n0101001,COMPLET\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].get("statut"), "COMPLET");
        assert_eq!(records[0].get("tirage"), "");
    }

    #[test]
    fn first_of_coalesces() {
        let file = write_csv("a,b,c\n,x,y\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0].first_of(&["a", "b", "c"]), "x");
        assert_eq!(records[0].first_of(&["a"]), "");
    }

    #[test]
    fn missing_file_errors() {
        assert!(load_records(Path::new("/nonexistent/NOPE.CSV")).is_err());
    }
}
