// src/nix/client.rs

//! `NixBackend` implementation that runs the real commands

use super::search::{parse_search_output, SearchResult};
use super::{ApplyTarget, NixBackend};
use crate::error::{Error, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::{debug, info, warn};

const UNKNOWN_VERSION: &str = "unknown";

/// Runs `nix`, `home-manager` and `git` as child processes
#[derive(Debug, Clone)]
pub struct NixClient {
    target: ApplyTarget,
}

impl NixClient {
    pub fn new(target: ApplyTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ApplyTarget {
        &self.target
    }

    fn switch_args(&self) -> Vec<String> {
        match &self.target {
            ApplyTarget::HomeNix(home_nix) => vec![
                "switch".into(),
                "-f".into(),
                home_nix.display().to_string(),
            ],
            ApplyTarget::Flake { path, config } => vec![
                "switch".into(),
                "--flake".into(),
                format!("{}#{}", path.display(), config),
            ],
        }
    }
}

impl NixBackend for NixClient {
    fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let output = run("nix", &["search", "nixpkgs", keyword, "--json"])?;
        if !output.status.success() {
            return Err(Error::Command(format!(
                "nix search failed: {}",
                failure_message(&output)
            )));
        }
        parse_search_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn package_exists(&self, name: &str) -> Result<bool> {
        match self.search(name) {
            Ok(results) => Ok(results.iter().any(|r| r.name == name)),
            Err(e) => {
                debug!("Treating {} as missing: {}", name, e);
                Ok(false)
            }
        }
    }

    fn apply(&self) -> Result<()> {
        let args = self.switch_args();
        info!("Running home-manager {}", args.join(" "));

        let output = Command::new("home-manager")
            .args(&args)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| Error::Command(format!("Failed to execute home-manager: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Command(format!(
                "home-manager {} failed: {}",
                args.join(" "),
                failure_message(&output)
            )));
        }

        echo_stdout(&output, &mut io::stdout())?;
        Ok(())
    }

    fn package_version(&self, name: &str) -> Result<String> {
        let attr = format!("nixpkgs#{}.version", name);
        let output = match run("nix", &["eval", &attr, "--raw"]) {
            Ok(output) if output.status.success() => output,
            _ => return Ok(UNKNOWN_VERSION.to_string()),
        };

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            Ok(UNKNOWN_VERSION.to_string())
        } else {
            Ok(version)
        }
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let ApplyTarget::Flake { path: flake, .. } = &self.target else {
            return Ok(());
        };
        let flake = flake.display().to_string();

        let is_repo = run("git", &["-C", &flake, "rev-parse", "--git-dir"])
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !is_repo {
            warn!("{} is not a git repository, skipping git add", flake);
            return Ok(());
        }

        let file = path.display().to_string();
        let output = run("git", &["-C", &flake, "add", &file])?;
        if !output.status.success() {
            return Err(Error::Command(format!(
                "git add {} failed: {}",
                file,
                failure_message(&output)
            )));
        }
        debug!("Staged {} in {}", file, flake);
        Ok(())
    }
}

fn run(program: &str, args: &[&str]) -> Result<Output> {
    debug!("Running {} {}", program, args.join(" "));
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Command(format!("Failed to execute {}: {}", program, e)))
}

/// Pass a finished command's stdout on to `out`
fn echo_stdout(output: &Output, out: &mut impl Write) -> Result<()> {
    out.write_all(&output.stdout)?;
    out.flush()?;
    Ok(())
}

/// Combined stdout/stderr, falling back to the exit code
fn failure_message(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if combined.is_empty() {
        format!("exit code {:?}", output.status.code())
    } else {
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_switch_args_home_nix() {
        let client = NixClient::new(ApplyTarget::HomeNix(PathBuf::from("/h/home.nix")));
        assert_eq!(client.switch_args(), ["switch", "-f", "/h/home.nix"]);
    }

    #[test]
    fn test_switch_args_flake() {
        let client = NixClient::new(ApplyTarget::Flake {
            path: PathBuf::from("/h/dots"),
            config: "alice@laptop".to_string(),
        });
        assert_eq!(client.switch_args(), ["switch", "--flake", "/h/dots#alice@laptop"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_stdout_forwards_switch_output() {
        use std::os::unix::process::ExitStatusExt;

        let output = Output {
            status: std::process::ExitStatus::from_raw(0),
            stdout: b"Starting Home Manager activation\n".to_vec(),
            stderr: b"warning: dirty tree\n".to_vec(),
        };
        let mut out = Vec::new();
        echo_stdout(&output, &mut out).unwrap();
        assert_eq!(out, b"Starting Home Manager activation\n");
    }

    #[test]
    fn test_stage_is_noop_without_flake() {
        let client = NixClient::new(ApplyTarget::HomeNix(PathBuf::from("/h/home.nix")));
        assert!(client.stage(Path::new("/h/p.nix")).is_ok());
    }
}
