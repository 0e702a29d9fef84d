// src/nixfile/backup.rs

//! Single-slot backup and atomic file replacement
//!
//! The backup lives next to the document as `<file>.bak` and is overwritten
//! by every mutation, so rollback only ever reaches the state right before
//! the most recent change.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const BACKUP_SUFFIX: &str = ".bak";

/// Path of the backup slot for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Snapshot the current contents of `path` into its backup slot
pub fn backup(path: &Path) -> Result<()> {
    let content = fs::read(path)?;
    let dest = backup_path(path);
    debug!("Backing up {} to {}", path.display(), dest.display());
    write_atomic(&dest, &content)
}

/// Restore `path` from its backup slot
pub fn rollback(path: &Path) -> Result<()> {
    let src = backup_path(path);
    let content = match fs::read(&src) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::BackupNotFound(src));
        }
        Err(e) => return Err(e.into()),
    };
    debug!("Restoring {} from {}", path.display(), src.display());
    write_atomic(path, &content)
}

/// Replace `path` with `content` without ever exposing a partial file
///
/// Writes to a temp file in the same directory and renames it over the
/// target. The temp file is removed if anything fails before the rename.
/// Existing permissions of the target are carried over. A symlinked target
/// is written through: the link stays and the file it points to is replaced.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let path = resolve_target(path)?;
    let path = path.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => set_default_permissions(tmp.as_file())?,
        Err(e) => return Err(e.into()),
    }

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Follow symlinks to the file that should actually be replaced
fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
