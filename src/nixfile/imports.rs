// src/nixfile/imports.rs

//! Registers the packages file in `home.nix`
//!
//! Adds `./<packages file>` to the module's `imports = [ ... ];` list,
//! creating the list right after the module header when it is missing.

use super::backup;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const IMPORTS_OPEN: &str = "imports = [";
const LIST_CLOSE: &str = "];";

/// Module headers after which a new `imports` list can be inserted
const MODULE_HEADERS: [&str; 2] = ["}: {", "in {"];

/// Add an import of `packages_file` to `home_nix`
///
/// Returns `Ok(false)` when the file already references the packages file.
/// `home.nix` is backed up to `home.nix.bak` before it is rewritten.
pub fn add_import(home_nix: &Path, packages_file: &Path) -> Result<bool> {
    let content = fs::read_to_string(home_nix)?;
    let line = import_line(home_nix, packages_file);

    if content.contains(&line) || content.contains(&*packages_file.to_string_lossy()) {
        debug!("{} already imports {}", home_nix.display(), packages_file.display());
        return Ok(false);
    }

    let updated = insert_import(&content, &line)?;

    backup::backup(home_nix)?;
    backup::write_atomic(home_nix, updated.as_bytes())?;
    info!("Added import of {} to {}", packages_file.display(), home_nix.display());
    Ok(true)
}

/// `\t./relative/path` when the packages file sits under `home.nix`'s
/// directory, otherwise the absolute path
fn import_line(home_nix: &Path, packages_file: &Path) -> String {
    let base = home_nix.parent().unwrap_or_else(|| Path::new(""));
    match packages_file.strip_prefix(base) {
        Ok(rel) if !base.as_os_str().is_empty() => format!("\t./{}", rel.display()),
        _ => format!("\t{}", absolute(packages_file).display()),
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn insert_import(content: &str, line: &str) -> Result<String> {
    if let Some(start) = content.find(IMPORTS_OPEN) {
        let close = content[start..]
            .find(LIST_CLOSE)
            .ok_or_else(|| Error::Parse("imports list is not closed with '];'".to_string()))?;
        let at = start + close;
        return Ok(format!("{}\n{}\n\t{}", &content[..at], line, &content[at..]));
    }

    for header in MODULE_HEADERS {
        if let Some(pos) = content.find(header) {
            let at = pos + header.len();
            return Ok(format!(
                "{}\n\t{}\n{}\n\t{}\n{}",
                &content[..at],
                IMPORTS_OPEN,
                line,
                LIST_CLOSE,
                &content[at..]
            ));
        }
    }

    Err(Error::Parse(
        "cannot find the module body ('}: {' or 'in {') in home.nix".to_string(),
    ))
}
