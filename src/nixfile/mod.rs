// src/nixfile/mod.rs

//! Packages file management
//!
//! This module owns the packages file (a home-manager module holding a single
//! `home.packages` list) and its backup slot:
//! - Parsing the package list out of the file
//! - Regenerating the file canonically after a change
//! - Previewing changes as a diff
//! - Backing up before every mutation and rolling back on request

mod backup;
pub mod diff;
mod generator;
pub mod imports;
pub mod parser;
mod set;

pub use backup::{backup_path, write_atomic};
pub use diff::{Change, DiffLine, DiffReport};
pub use generator::{generate, EMPTY_PLACEHOLDER};
pub use parser::parse;
pub use set::PackageSet;

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads and rewrites one packages file
///
/// Every operation is a fresh read-modify-write; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct Manager {
    path: PathBuf,
}

impl Manager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        backup::backup_path(&self.path)
    }

    /// Packages in file order
    pub fn list_packages(&self) -> Result<PackageSet> {
        let content = fs::read_to_string(&self.path)?;
        Ok(parse(&content))
    }

    pub fn has_package(&self, name: &str) -> Result<bool> {
        Ok(self.list_packages()?.contains(name))
    }

    /// Add `name`, keeping the list sorted
    ///
    /// The backup slot is refreshed before the duplicate check, so a rejected
    /// add still rewrites the backup with the unchanged contents.
    pub fn add_package(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        backup::backup(&self.path)?;

        let mut packages = self.list_packages()?;
        if !packages.insert_sorted(name) {
            return Err(Error::Duplicate(name.to_string()));
        }

        self.write(&packages)?;
        info!("Added {} to {}", name, self.path.display());
        Ok(())
    }

    /// Remove `name`, keeping the order of the rest
    pub fn remove_package(&self, name: &str) -> Result<()> {
        backup::backup(&self.path)?;

        let packages = self.list_packages()?;
        if !packages.contains(name) {
            return Err(Error::PackageNotFound(name.to_string()));
        }

        self.write(&packages.without(name))?;
        info!("Removed {} from {}", name, self.path.display());
        Ok(())
    }

    /// Preview adding (`is_add`) or removing `name` without touching the file
    pub fn get_diff(&self, name: &str, is_add: bool) -> Result<DiffReport> {
        if is_add {
            validate_name(name)?;
        }
        let before = self.list_packages()?;
        let after = if is_add {
            let mut after = before.clone();
            after.insert_sorted(name);
            after
        } else {
            before.without(name)
        };
        Ok(diff::diff(&before, &after))
    }

    /// Restore the file from the backup taken by the last add/remove
    pub fn rollback(&self) -> Result<()> {
        backup::rollback(&self.path)?;
        info!("Rolled back {}", self.path.display());
        Ok(())
    }

    /// Write an empty packages file unless one already exists
    pub fn create_if_missing(&self) -> Result<bool> {
        if self.path.exists() {
            debug!("Packages file already exists: {}", self.path.display());
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, generate::<&str>(&[]).as_bytes())?;
        info!("Created packages file {}", self.path.display());
        Ok(true)
    }

    fn write(&self, packages: &PackageSet) -> Result<()> {
        debug!("Writing {} package(s) to {}", packages.len(), self.path.display());
        write_atomic(&self.path, generate(packages.as_slice()).as_bytes())
    }
}

/// Reject names that would not survive a write and re-parse
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains(char::is_whitespace)
        || name.contains('#')
        || name.contains(generator::BLOCK_CLOSE)
    {
        return Err(Error::Parse(format!("invalid package name: {:?}", name)));
    }
    Ok(())
}
