// src/config.rs

//! Configuration for focus
//!
//! A small TOML file naming the home-manager entry point, the packages file
//! managed by focus, and optional flake settings. Paths may start with `~`.
//!
//! Lookup order: `--config`, `$FOCUS_CONFIG`, `./focus.toml`,
//! `~/.focus.toml`, `~/.config/focus/config.toml`.

use crate::error::{Error, Result};
use crate::nix::ApplyTarget;
use crate::nixfile::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "FOCUS_CONFIG";

/// Fallback when no config file exists anywhere
pub const DEFAULT_CONFIG_PATH: &str = "./focus.toml";

pub const DEFAULT_HOME_NIX: &str = "~/.config/home-manager/home.nix";

/// File name of the packages file created next to home.nix
pub const PACKAGES_FILE_NAME: &str = "focus-packages.nix";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub home_nix_path: String,
    pub packages_file_path: String,
    pub use_flake: bool,
    pub flake_path: String,
    pub flake_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_nix_path: DEFAULT_HOME_NIX.to_string(),
            packages_file_path: format!("~/.config/home-manager/{}", PACKAGES_FILE_NAME),
            use_flake: false,
            flake_path: String::new(),
            flake_config: String::new(),
        }
    }
}

impl Config {
    /// Load and `~`-expand a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_path(path.as_ref())?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.home_nix_path = expand_str(&config.home_nix_path)?;
        config.packages_file_path = expand_str(&config.packages_file_path)?;
        if config.use_flake && !config.flake_path.is_empty() {
            config.flake_path = expand_str(&config.flake_path)?;
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = expand_path(path.as_ref())?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        write_atomic(&path, content.as_bytes())?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn exists(path: impl AsRef<Path>) -> bool {
        expand_path(path.as_ref())
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    pub fn packages_file(&self) -> PathBuf {
        PathBuf::from(&self.packages_file_path)
    }

    pub fn home_nix(&self) -> PathBuf {
        PathBuf::from(&self.home_nix_path)
    }

    pub fn apply_target(&self) -> ApplyTarget {
        if self.use_flake {
            ApplyTarget::Flake {
                path: PathBuf::from(&self.flake_path),
                config: self.flake_config.clone(),
            }
        } else {
            ApplyTarget::HomeNix(self.home_nix())
        }
    }
}

/// Replace a leading `~` or `~/` with the home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    match path.to_str() {
        Some(s) => expand_str(s).map(PathBuf::from),
        None => Ok(path.to_path_buf()),
    }
}

fn expand_str(path: &str) -> Result<String> {
    if path != "~" && !path.starts_with("~/") {
        return Ok(path.to_string());
    }

    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(match path.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => home.display().to_string(),
    })
}

/// Pick the config file to use
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(env_path);
    }

    candidates()
        .into_iter()
        .find(|p| Config::exists(p))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from("~/.focus.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("focus").join("config.toml"));
    }
    paths
}
