// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn package_arg() -> Arg {
    Arg::new("package")
        .required(true)
        .help("Package attribute name, e.g. ripgrep")
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .short('y')
        .long("yes")
        .action(ArgAction::SetTrue)
        .help("Do not ask for confirmation")
}

fn build_cli() -> Command {
    Command::new("focus")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Focus Contributors")
        .about("Homebrew-style package management for Nix home-manager")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Config file path"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the config file and packages file, and import it from home.nix")
                .arg(
                    Arg::new("home_nix")
                        .long("home-nix")
                        .value_name("PATH")
                        .default_value("~/.config/home-manager/home.nix")
                        .help("Path to home.nix"),
                )
                .arg(
                    Arg::new("packages_file")
                        .long("packages-file")
                        .value_name("PATH")
                        .help("Packages file (default: focus-packages.nix next to home.nix)"),
                )
                .arg(
                    Arg::new("config_out")
                        .long("config-out")
                        .value_name("PATH")
                        .default_value("./focus.toml")
                        .help("Where to write the config file"),
                )
                .arg(
                    Arg::new("flake")
                        .long("flake")
                        .value_name("PATH")
                        .requires("flake_config")
                        .help("Flake directory (enables flake mode)"),
                )
                .arg(
                    Arg::new("flake_config")
                        .long("flake-config")
                        .value_name("NAME")
                        .help("Flake home configuration name"),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing config file"),
                ),
        )
        .subcommand(
            Command::new("install")
                .about("Install a package")
                .arg(package_arg())
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("uninstall")
                .about("Uninstall a package")
                .arg(package_arg())
                .arg(yes_arg()),
        )
        .subcommand(Command::new("list").about("List packages installed with focus"))
        .subcommand(
            Command::new("search")
                .about("Search nixpkgs")
                .arg(Arg::new("keyword").required(true).help("Search keyword")),
        )
        .subcommand(
            Command::new("update")
                .about("Re-apply the configuration (updates follow the pinned nixpkgs)")
                .arg(Arg::new("package").help("Only check that this package is managed")),
        )
        .subcommand(
            Command::new("diff")
                .about("Preview the change an install or uninstall would make")
                .arg(package_arg())
                .arg(
                    Arg::new("remove")
                        .long("remove")
                        .action(ArgAction::SetTrue)
                        .help("Preview removal instead of addition"),
                ),
        )
        .subcommand(
            Command::new("rollback").about("Restore the packages file from its backup and re-apply"),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("focus.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
