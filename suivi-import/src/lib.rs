//! suivi-import library - CSV import for the survey monitoring database
//!
//! Merges the two field exports (INFO_GEN, INFO_MEN_RECORD) into the four
//! entity tables. Upsert by natural key is the default; `--reset` opts into
//! delete-all-then-reimport.

pub mod error;
pub mod parse;
pub mod phases;
pub mod regions;
pub mod source;

pub use error::{ImportError, Result};
pub use phases::{run_import, ImportOptions, ImportSummary};
