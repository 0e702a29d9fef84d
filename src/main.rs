// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use focus::config::{self, Config, DEFAULT_CONFIG_PATH, DEFAULT_HOME_NIX, PACKAGES_FILE_NAME};
use focus::nix::{NixBackend, NixClient};
use focus::nixfile::{imports, DiffReport, Manager};
use focus::workflow::{self, Outcome};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "focus")]
#[command(author, version, about = "Homebrew-style package management for Nix home-manager", long_about = None)]
struct Cli {
    /// Config file path (default: $FOCUS_CONFIG, ./focus.toml, ~/.focus.toml, ~/.config/focus/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and packages file, and import it from home.nix
    Init {
        /// Path to home.nix
        #[arg(long, default_value = DEFAULT_HOME_NIX)]
        home_nix: PathBuf,
        /// Packages file (default: focus-packages.nix next to home.nix)
        #[arg(long)]
        packages_file: Option<PathBuf>,
        /// Where to write the config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config_out: PathBuf,
        /// Flake directory (enables flake mode)
        #[arg(long, requires = "flake_config")]
        flake: Option<PathBuf>,
        /// Flake home configuration name, e.g. alice@laptop
        #[arg(long)]
        flake_config: Option<String>,
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
    /// Install a package
    Install {
        /// Package attribute name, e.g. ripgrep
        package: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Uninstall a package
    Uninstall {
        /// Package attribute name
        package: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List packages installed with focus
    List,
    /// Search nixpkgs
    Search {
        /// Search keyword
        keyword: String,
    },
    /// Re-apply the configuration (updates follow the pinned nixpkgs)
    Update {
        /// Only check that this package is managed before applying
        package: Option<String>,
    },
    /// Preview the change an install or uninstall would make
    Diff {
        /// Package attribute name
        package: String,
        /// Preview removal instead of addition
        #[arg(long)]
        remove: bool,
    },
    /// Restore the packages file from its backup and re-apply
    Rollback,
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init {
            home_nix,
            packages_file,
            config_out,
            flake,
            flake_config,
            force,
        }) => cmd_init(home_nix, packages_file, config_out, flake, flake_config, force),
        Some(Commands::Install { package, yes }) => {
            let (cfg, manager, client) = load(cli.config.as_deref())?;
            info!("Installing package: {}", package);

            println!("Searching for '{}'...", package);
            let outcome = workflow::install(&manager, &client, &package, |diff| {
                confirm_change(diff, yes)
            })
            .with_context(|| format!("Failed to install '{}'", package))?;

            match outcome {
                Outcome::Applied => println!(
                    "Installed package: {} (added to {})",
                    package, cfg.packages_file_path
                ),
                Outcome::AlreadyInState => println!("Package '{}' is already installed", package),
                Outcome::Cancelled => println!("Installation cancelled"),
            }
            Ok(())
        }
        Some(Commands::Uninstall { package, yes }) => {
            let (cfg, manager, client) = load(cli.config.as_deref())?;
            info!("Uninstalling package: {}", package);

            let outcome = workflow::uninstall(&manager, &client, &package, |diff| {
                confirm_change(diff, yes)
            })
            .with_context(|| format!("Failed to uninstall '{}'", package))?;

            match outcome {
                Outcome::Applied => println!(
                    "Uninstalled package: {} (removed from {})",
                    package, cfg.packages_file_path
                ),
                Outcome::AlreadyInState => println!("Package '{}' is not installed", package),
                Outcome::Cancelled => println!("Uninstallation cancelled"),
            }
            Ok(())
        }
        Some(Commands::List) => {
            let (_cfg, manager, client) = load(cli.config.as_deref())?;
            let packages = manager.list_packages().context("Failed to list packages")?;

            if packages.is_empty() {
                println!("No packages installed with focus.");
            } else {
                println!("Installed packages:");
                for pkg in &packages {
                    let version = client.package_version(pkg)?;
                    println!("  {} {}", pkg, version);
                }
                println!("\nTotal: {} package(s)", packages.len());
            }
            Ok(())
        }
        Some(Commands::Search { keyword }) => {
            let client = match load(cli.config.as_deref()) {
                Ok((_, _, client)) => client,
                Err(_) => NixClient::new(Config::default().apply_target()),
            };

            println!("Searching for '{}'...\n", keyword);
            let results = client.search(&keyword).context("Search failed")?;

            if results.is_empty() {
                println!("No packages matching '{}' found.", keyword);
            } else {
                for result in &results {
                    println!("  {} {}", result.name, result.version);
                    if !result.description.is_empty() {
                        println!("    {}", result.description);
                    }
                }
                println!("\nTotal: {} result(s)", results.len());
            }
            Ok(())
        }
        Some(Commands::Update { package }) => {
            let (_cfg, manager, client) = load(cli.config.as_deref())?;
            println!("Running home-manager switch...");
            let version = workflow::update(&manager, &client, package.as_deref())
                .context("Update failed")?;
            if let (Some(package), Some(version)) = (&package, &version) {
                println!("Updated package: {} {}", package, version);
            }
            println!("Update complete.");
            Ok(())
        }
        Some(Commands::Diff { package, remove }) => {
            let (_cfg, manager, _client) = load(cli.config.as_deref())?;
            let diff = manager
                .get_diff(&package, !remove)
                .context("Failed to compute diff")?;
            println!("{}", diff);
            Ok(())
        }
        Some(Commands::Rollback) => {
            let (_cfg, manager, client) = load(cli.config.as_deref())?;
            info!("Rolling back {}", manager.path().display());

            println!(
                "Restoring {} from {} and running home-manager switch...",
                manager.path().display(),
                manager.backup_path().display()
            );
            workflow::rollback(&manager, &client).context("Rollback failed")?;
            println!("Rollback complete.");
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "focus", &mut io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("focus v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'focus --help' for usage information");
            Ok(())
        }
    }
}

/// Load the config and build the packages file manager and Nix client
fn load(explicit: Option<&Path>) -> Result<(Config, Manager, NixClient)> {
    let path = config::resolve_config_path(explicit);
    let cfg = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
    let manager = Manager::new(cfg.packages_file());
    let client = NixClient::new(cfg.apply_target());
    Ok((cfg, manager, client))
}

fn cmd_init(
    home_nix: PathBuf,
    packages_file: Option<PathBuf>,
    config_out: PathBuf,
    flake: Option<PathBuf>,
    flake_config: Option<String>,
    force: bool,
) -> Result<()> {
    if Config::exists(&config_out) && !force {
        anyhow::bail!(
            "Config file {} already exists (use --force to overwrite)",
            config_out.display()
        );
    }

    let home_nix = config::expand_path(&home_nix)?;
    let packages_file = match packages_file {
        Some(path) => config::expand_path(&path)?,
        None => home_nix
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(PACKAGES_FILE_NAME),
    };

    let cfg = Config {
        home_nix_path: home_nix.display().to_string(),
        packages_file_path: packages_file.display().to_string(),
        use_flake: flake.is_some(),
        flake_path: flake.map(|p| p.display().to_string()).unwrap_or_default(),
        flake_config: flake_config.unwrap_or_default(),
    };
    cfg.save(&config_out).context("Failed to save config")?;
    println!("Saved config: {}", config_out.display());

    let manager = Manager::new(&packages_file);
    if manager.create_if_missing()? {
        println!("Created {}", packages_file.display());
    }

    if home_nix.exists() {
        if imports::add_import(&home_nix, &packages_file)
            .with_context(|| format!("Failed to add import to {}", home_nix.display()))?
        {
            println!("Added import to {}", home_nix.display());
        }
    } else {
        eprintln!(
            "Warning: {} not found; add {} to your imports manually",
            home_nix.display(),
            packages_file.display()
        );
    }

    if cfg.use_flake {
        NixClient::new(cfg.apply_target()).stage(&packages_file)?;
    }

    println!("\nSetup complete. Install packages with:");
    println!("  focus install <package>");
    Ok(())
}

/// Show the preview and ask for confirmation (unless `yes`)
fn confirm_change(diff: &DiffReport, yes: bool) -> bool {
    println!("\nChanges:");
    println!("{}\n", diff);

    if yes {
        return true;
    }

    print!("Continue? [y/N]: ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with('y')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  Yes "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_cli_parses_install() {
        let cli = Cli::try_parse_from(["focus", "install", "ripgrep", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Install { ref package, yes: true }) if package == "ripgrep"
        ));
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli = Cli::try_parse_from(["focus", "list", "--config", "/tmp/f.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/f.toml")));
    }

    #[test]
    fn test_cli_flake_requires_config_name() {
        assert!(Cli::try_parse_from(["focus", "init", "--flake", "/dots"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
