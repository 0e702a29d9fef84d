// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for focus
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors (document read/write, backup)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Package is already listed in the packages file
    #[error("Package '{0}' is already installed")]
    Duplicate(String),

    /// Package is not listed in the packages file, or not known to nixpkgs
    #[error("Package '{0}' not found")]
    PackageNotFound(String),

    /// Rollback requested but no backup slot exists
    #[error("Backup not found at path: {}", .0.display())]
    BackupNotFound(PathBuf),

    /// Configuration file missing
    #[error("Configuration file not found: {} (run 'focus init' first)", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// A Nix file has a structure we cannot edit
    #[error("Parse error: {0}")]
    Parse(String),

    /// An external command (nix, home-manager, git) failed
    #[error("Command failed: {0}")]
    Command(String),

    /// Applying the configuration failed; the packages file was rolled back
    #[error("home-manager switch failed (changes rolled back): {0}")]
    ApplyFailed(String),

    /// Applying failed and restoring the backup failed too
    #[error("Rollback failed: {rollback} (original error: {apply})")]
    RollbackFailed { apply: String, rollback: String },
}

impl Error {
    /// True for the not-found kinds (missing package or missing backup)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PackageNotFound(_) | Error::BackupNotFound(_))
    }
}

/// Result type alias using focus's Error type
pub type Result<T> = std::result::Result<T, Error>;
