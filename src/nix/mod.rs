// src/nix/mod.rs

//! Nix and home-manager integration
//!
//! The `NixBackend` trait is everything the install/uninstall workflow needs
//! from the outside world. `NixClient` implements it by running `nix`,
//! `home-manager` and `git`.

mod client;
pub mod search;

pub use client::NixClient;
pub use search::SearchResult;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// How `home-manager switch` is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyTarget {
    /// `home-manager switch -f <home.nix>`
    HomeNix(PathBuf),
    /// `home-manager switch --flake <path>#<config>`
    Flake { path: PathBuf, config: String },
}

/// Search, inspect and apply packages
pub trait NixBackend {
    /// Search nixpkgs for `keyword`
    fn search(&self, keyword: &str) -> Result<Vec<SearchResult>>;

    /// Whether nixpkgs has a package with exactly this attribute name
    fn package_exists(&self, name: &str) -> Result<bool>;

    /// Apply the home-manager configuration
    fn apply(&self) -> Result<()>;

    /// Version string of a package in nixpkgs ("unknown" if unavailable)
    fn package_version(&self, name: &str) -> Result<String>;

    /// Make a changed file visible to the build (git add for flakes)
    fn stage(&self, path: &Path) -> Result<()>;
}
