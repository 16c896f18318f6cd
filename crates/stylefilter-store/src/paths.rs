use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_SUFFIX: &str = "bak.json";

pub fn resolve_style_path(custom: Option<PathBuf>, configured: Option<PathBuf>) -> Result<PathBuf> {
    match custom.or(configured) {
        Some(path) if path.as_os_str().is_empty() => Err(StoreError::InvalidStylePath(path)),
        Some(path) => Ok(path),
        None => Err(StoreError::MissingStylePath),
    }
}

pub fn default_backup_path(style_path: &Path, now: DateTime<Utc>) -> PathBuf {
    let stem = style_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("style");
    let name = format!("{}.{}.{}", stem, now.format("%Y%m%dT%H%M%SZ"), BACKUP_SUFFIX);
    style_path.with_file_name(name)
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub(crate) fn parent_or_cwd(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}
