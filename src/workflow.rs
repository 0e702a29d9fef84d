// src/workflow.rs

//! Install, uninstall and update workflows
//!
//! Each workflow previews the change, asks the caller to confirm, edits the
//! packages file, then runs `home-manager switch`. If the switch fails the
//! packages file is restored from its backup.

use crate::error::{Error, Result};
use crate::nix::NixBackend;
use crate::nixfile::{DiffReport, Manager};
use tracing::{info, warn};

/// What a workflow ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change was written and applied
    Applied,
    /// Nothing to do (already installed / not installed)
    AlreadyInState,
    /// The caller declined the preview
    Cancelled,
}

/// Add `name` to the packages file and apply it
pub fn install<B, F>(manager: &Manager, backend: &B, name: &str, confirm: F) -> Result<Outcome>
where
    B: NixBackend + ?Sized,
    F: FnOnce(&DiffReport) -> bool,
{
    if manager.has_package(name)? {
        info!("{} is already installed", name);
        return Ok(Outcome::AlreadyInState);
    }

    if !backend.package_exists(name)? {
        return Err(Error::PackageNotFound(name.to_string()));
    }

    let preview = manager.get_diff(name, true)?;
    if !confirm(&preview) {
        return Ok(Outcome::Cancelled);
    }

    manager.add_package(name)?;
    apply_or_rollback(manager, backend)?;
    info!("Installed {}", name);
    Ok(Outcome::Applied)
}

/// Remove `name` from the packages file and apply it
pub fn uninstall<B, F>(manager: &Manager, backend: &B, name: &str, confirm: F) -> Result<Outcome>
where
    B: NixBackend + ?Sized,
    F: FnOnce(&DiffReport) -> bool,
{
    if !manager.has_package(name)? {
        info!("{} is not installed", name);
        return Ok(Outcome::AlreadyInState);
    }

    let preview = manager.get_diff(name, false)?;
    if !confirm(&preview) {
        return Ok(Outcome::Cancelled);
    }

    manager.remove_package(name)?;
    apply_or_rollback(manager, backend)?;
    info!("Uninstalled {}", name);
    Ok(Outcome::Applied)
}

/// Re-run `home-manager switch`, optionally checking `name` is managed first
///
/// Versions follow the pinned nixpkgs, so updating is just re-applying.
/// Returns the version of `name` after the switch.
pub fn update<B>(manager: &Manager, backend: &B, name: Option<&str>) -> Result<Option<String>>
where
    B: NixBackend + ?Sized,
{
    if let Some(name) = name {
        if !manager.has_package(name)? {
            return Err(Error::PackageNotFound(name.to_string()));
        }
    }
    backend.apply()?;
    name.map(|name| backend.package_version(name)).transpose()
}

/// Restore the packages file from its backup and apply the restored state
pub fn rollback<B>(manager: &Manager, backend: &B) -> Result<()>
where
    B: NixBackend + ?Sized,
{
    manager.rollback()?;
    stage(manager, backend);
    backend.apply()
}

/// Staging only matters for flakes; a failure is reported but not fatal
fn stage<B: NixBackend + ?Sized>(manager: &Manager, backend: &B) {
    if let Err(e) = backend.stage(manager.path()) {
        warn!("Failed to stage {}: {}", manager.path().display(), e);
    }
}

fn apply_or_rollback<B: NixBackend + ?Sized>(manager: &Manager, backend: &B) -> Result<()> {
    stage(manager, backend);

    let apply_err = match backend.apply() {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    warn!("Apply failed, rolling back {}", manager.path().display());
    if let Err(rollback_err) = manager.rollback() {
        return Err(Error::RollbackFailed {
            apply: apply_err.to_string(),
            rollback: rollback_err.to_string(),
        });
    }
    stage(manager, backend);

    Err(Error::ApplyFailed(apply_err.to_string()))
}
