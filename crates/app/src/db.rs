use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

pub const DEFAULT_DB_URL: &str = "sqlite://learn.sqlite3";

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories if missing.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_full_and_memory_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url(" sqlite:///tmp/learn.db "),
            "sqlite:///tmp/learn.db"
        );
    }

    #[test]
    fn absolutizes_bare_paths() {
        assert_eq!(normalize_sqlite_url("/var/learn.db"), "sqlite:///var/learn.db");
        assert!(normalize_sqlite_url("sqlite:learn.db").starts_with("sqlite:///"));
    }

    #[test]
    fn prepare_creates_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("learn.sqlite3");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(path.exists());
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://x").is_err());
    }
}
