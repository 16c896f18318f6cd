use crate::error::{Result, StoreError};
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies the style document to `dest`, refusing to overwrite the document
/// itself. Returns the number of bytes written.
pub fn backup_to(style_path: &Path, dest: &Path) -> Result<u64> {
    paths::ensure_parent_dir(dest)?;
    let source = fs::canonicalize(style_path)?;
    let target = canonicalize_path(dest)?;
    if source == target || is_same_file_identity(&target, &source)? {
        return Err(StoreError::InvalidBackupPath(dest.to_path_buf()));
    }
    Ok(fs::copy(&source, &target)?)
}

fn canonicalize_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let parent = fs::canonicalize(paths::parent_or_cwd(path))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidBackupPath(path.to_path_buf()))?;
    Ok(parent.join(file_name))
}

#[cfg(unix)]
fn is_same_file_identity(target: &Path, source: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    if !target.exists() {
        return Ok(false);
    }
    let target_meta = fs::metadata(target)?;
    let source_meta = fs::metadata(source)?;
    Ok(target_meta.dev() == source_meta.dev() && target_meta.ino() == source_meta.ino())
}

#[cfg(not(unix))]
fn is_same_file_identity(_target: &Path, _source: &Path) -> Result<bool> {
    Ok(false)
}
