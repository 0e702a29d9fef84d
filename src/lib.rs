// src/lib.rs

//! focus - package management for Nix home-manager
//!
//! Manages a dedicated home-manager module that holds a single
//! `home.packages = with pkgs; [ ... ];` list, and applies changes with
//! `home-manager switch`, restoring the previous file when the switch fails.
//!
//! # Architecture
//!
//! - File-first: the packages file is the only state, regenerated canonically
//! - Single-slot backup: every mutation snapshots `<file>.bak` first
//! - Atomic writes: temp file in the same directory, renamed over the target
//! - Pluggable backend: `NixBackend` wraps `nix`, `home-manager` and `git`

pub mod config;
mod error;
pub mod nix;
pub mod nixfile;
pub mod workflow;

pub use error::{Error, Result};
