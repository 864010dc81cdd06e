//! Configuration resolution
//!
//! Locates the SQLite database shared by the API service and the importer.

use std::path::{Path, PathBuf};

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "SUIVI_DATABASE";

/// Compiled default database file name (relative to the working directory)
pub const DEFAULT_DATABASE: &str = "suivi.db";

/// Database path resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `SUIVI_DATABASE` environment variable
/// 3. Compiled default (`./suivi.db`)
pub fn resolve_database_path(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: Compiled default
    PathBuf::from(DEFAULT_DATABASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let path = resolve_database_path(Some(Path::new("/tmp/other.db")));
        assert_eq!(path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn falls_back_to_default() {
        // Only valid when the env var is not set in the test environment
        if std::env::var(DATABASE_ENV_VAR).is_err() {
            assert_eq!(resolve_database_path(None), PathBuf::from(DEFAULT_DATABASE));
        }
    }
}
