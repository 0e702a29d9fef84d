// tests/integration_test.rs

//! Integration tests for focus
//!
//! These tests verify end-to-end functionality across modules.

use focus::config::Config;
use focus::nixfile::{backup_path, generate, imports, parse, Change, Manager, EMPTY_PLACEHOLDER};
use focus::Error;
use std::fs;
use tempfile::TempDir;

fn packages_file(content: &str) -> (TempDir, Manager) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focus-packages.nix");
    fs::write(&path, content).unwrap();
    (dir, Manager::new(path))
}

#[test]
fn test_empty_block_lists_nothing() {
    let (_dir, manager) = packages_file(
        "{ pkgs, ... }: {\n  home.packages = with pkgs; [\n    # No packages\n  ];\n}\n",
    );
    assert!(manager.list_packages().unwrap().is_empty());
}

#[test]
fn test_add_to_hand_written_file() {
    let (_dir, manager) = packages_file(
        "{ pkgs, ... }: {\n  home.packages = with pkgs; [\n    ripgrep\n    fzf\n    neovim\n  ];\n}\n",
    );

    assert_eq!(
        manager.list_packages().unwrap().as_slice(),
        ["ripgrep", "fzf", "neovim"]
    );

    manager.add_package("bat").unwrap();
    assert_eq!(
        manager.list_packages().unwrap().as_slice(),
        ["bat", "fzf", "neovim", "ripgrep"]
    );

    // The file is now in canonical form
    assert_eq!(
        fs::read_to_string(manager.path()).unwrap(),
        generate(&["bat", "fzf", "neovim", "ripgrep"])
    );
}

#[test]
fn test_duplicate_add_keeps_contents() {
    let original = generate(&["fzf", "ripgrep"]);
    let (_dir, manager) = packages_file(&original);

    let err = manager.add_package("ripgrep").unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));
    assert_eq!(fs::read_to_string(manager.path()).unwrap(), original);
    assert_eq!(fs::read_to_string(manager.backup_path()).unwrap(), original);
}

#[test]
fn test_preview_then_remove() {
    let (_dir, manager) = packages_file(&generate(&["fzf", "ripgrep"]));

    let preview = manager.get_diff("fzf", false).unwrap();
    let changes: Vec<_> = preview
        .lines()
        .iter()
        .map(|l| (l.change, l.name.as_str()))
        .collect();
    assert_eq!(changes, [(Change::Removed, "fzf"), (Change::Unchanged, "ripgrep")]);

    manager.remove_package("fzf").unwrap();
    assert_eq!(manager.list_packages().unwrap().as_slice(), ["ripgrep"]);
}

#[test]
fn test_remove_missing_is_not_found() {
    let original = generate(&["ripgrep"]);
    let (_dir, manager) = packages_file(&original);

    let err = manager.remove_package("missing").unwrap_err();
    assert!(matches!(err, Error::PackageNotFound(ref n) if n == "missing"));
    assert_eq!(fs::read_to_string(manager.path()).unwrap(), original);
}

#[test]
fn test_add_then_rollback_restores_list() {
    let (_dir, manager) = packages_file(&generate(&["fzf", "ripgrep"]));
    let before = manager.list_packages().unwrap();

    manager.add_package("x").unwrap();
    assert!(manager.has_package("x").unwrap());

    manager.rollback().unwrap();
    assert_eq!(manager.list_packages().unwrap(), before);
}

#[test]
fn test_backup_matches_state_before_each_mutation() {
    let (_dir, manager) = packages_file(&generate(&["a"]));

    let before_add = fs::read_to_string(manager.path()).unwrap();
    manager.add_package("b").unwrap();
    assert_eq!(fs::read_to_string(backup_path(manager.path())).unwrap(), before_add);

    let before_remove = fs::read_to_string(manager.path()).unwrap();
    manager.remove_package("a").unwrap();
    assert_eq!(fs::read_to_string(manager.backup_path()).unwrap(), before_remove);

    // Only the most recent state is recoverable
    manager.rollback().unwrap();
    assert_eq!(manager.list_packages().unwrap().as_slice(), ["a", "b"]);
}

#[test]
fn test_add_diff_marks_only_new_package() {
    let (_dir, manager) = packages_file(&generate(&["fzf", "neovim", "ripgrep"]));

    let preview = manager.get_diff("bat", true).unwrap();
    for line in preview.lines() {
        let expected = if line.name == "bat" {
            Change::Added
        } else {
            Change::Unchanged
        };
        assert_eq!(line.change, expected, "{}", line.name);
    }
    assert_eq!(preview.lines().len(), 4);
}

#[test]
fn test_surrounding_content_is_not_preserved() {
    let (_dir, manager) = packages_file(
        "{ pkgs, ... }: {\n  programs.git.enable = true;\n  home.packages = with pkgs; [ jq\n  ];\n}\n",
    );

    manager.add_package("bat").unwrap();

    let content = fs::read_to_string(manager.path()).unwrap();
    assert!(!content.contains("programs.git"));
    assert_eq!(parse(&content).as_slice(), ["bat", "jq"]);
}

#[test]
fn test_init_flow() {
    let dir = tempfile::tempdir().unwrap();
    let home_nix = dir.path().join("home.nix");
    let packages = dir.path().join("focus-packages.nix");
    let config_path = dir.path().join("focus.toml");
    fs::write(&home_nix, "{ config, pkgs, ... }: {\n  home.username = \"u\";\n}\n").unwrap();

    let cfg = Config {
        home_nix_path: home_nix.display().to_string(),
        packages_file_path: packages.display().to_string(),
        ..Config::default()
    };
    cfg.save(&config_path).unwrap();

    let manager = Manager::new(Config::load(&config_path).unwrap().packages_file());
    assert!(manager.create_if_missing().unwrap());
    assert!(imports::add_import(&home_nix, &packages).unwrap());

    let content = fs::read_to_string(manager.path()).unwrap();
    assert!(content.contains(EMPTY_PLACEHOLDER));
    assert!(fs::read_to_string(&home_nix).unwrap().contains("./focus-packages.nix"));

    manager.add_package("ripgrep").unwrap();
    assert_eq!(manager.list_packages().unwrap().as_slice(), ["ripgrep"]);
}
