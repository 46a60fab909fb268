//! Database connection management.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::kv::SqliteStore;
use super::migrations::run_migrations;

/// Opens (or creates) the store database and runs migrations.
///
/// - If `dir` is `Some`, uses `{dir}/moviefav.db`.
/// - Otherwise uses `$XDG_DATA_HOME/moviefav/moviefav.db`, falling back to
///   `~/.local/share/moviefav/moviefav.db`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrations fail.
pub fn open_store(dir: Option<&PathBuf>) -> Result<SqliteStore> {
    let db_path = resolve_db_path(dir)?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    run_migrations(&conn).context("database migration failed")?;

    tracing::debug!(path = %db_path.display(), "Opened key-value store");
    Ok(SqliteStore::new(conn))
}

/// Resolves the database file path.
fn resolve_db_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("moviefav.db"));
    }

    let data_home = match std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = std::env::var("HOME").context("HOME environment variable is not set")?;
            PathBuf::from(home).join(".local").join("share")
        }
    };
    Ok(data_home.join("moviefav").join("moviefav.db"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::kv::KeyValueStore;

    #[test]
    fn test_open_store_in_temp_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().join("nested");

        // Act
        let mut store = open_store(Some(&dir_path)).unwrap();
        store.put("k", "v").unwrap();

        // Assert
        assert!(dir_path.join("moviefav.db").exists());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_reopen_keeps_values() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();
        open_store(Some(&dir_path)).unwrap().put("darkMode", "true").unwrap();

        // Act
        let store = open_store(Some(&dir_path)).unwrap();

        // Assert
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_resolve_db_path_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let path = resolve_db_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/myproject/moviefav.db"));
    }

    #[test]
    fn test_resolve_db_path_default() {
        // Arrange & Act
        let path = resolve_db_path(None).unwrap();

        // Assert
        assert!(path.ends_with("moviefav/moviefav.db"));
    }
}
