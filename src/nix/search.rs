// src/nix/search.rs

//! Parsing of `nix search --json` output

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A package found in nixpkgs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Attribute name, usable in `home.packages`
    pub name: String,
    pub version: String,
    pub description: String,
}

/// One entry of the search output, keyed by attribute path
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: String,
}

/// Parse the JSON object printed by `nix search nixpkgs <kw> --json`
///
/// Keys look like `legacyPackages.x86_64-linux.ripgrep`; the
/// `legacyPackages.<system>.` prefix is stripped. Results are sorted by name.
pub fn parse_search_output(json: &str) -> Result<Vec<SearchResult>> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let entries: HashMap<String, RawEntry> = serde_json::from_str(trimmed)
        .map_err(|e| Error::Command(format!("Failed to parse nix search output: {}", e)))?;

    let mut results: Vec<SearchResult> = entries
        .into_iter()
        .map(|(attr, entry)| SearchResult {
            name: attribute_name(&attr).to_string(),
            version: entry.version,
            description: entry.description,
        })
        .collect();

    results.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(results)
}

fn attribute_name(attr_path: &str) -> &str {
    match attr_path.strip_prefix("legacyPackages.") {
        Some(rest) => rest.split_once('.').map(|(_, name)| name).unwrap_or(rest),
        None => attr_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_output() {
        let json = r#"{
            "legacyPackages.x86_64-linux.ripgrep": {
                "description": "A utility that combines the usability of The Silver Searcher with the raw speed of grep",
                "pname": "ripgrep",
                "version": "14.1.0"
            },
            "legacyPackages.x86_64-linux.ripgrep-all": {
                "description": "Ripgrep, but also search in PDFs, E-Books, Office documents, zip, tar.gz, and more",
                "pname": "ripgrep-all",
                "version": "0.10.6"
            }
        }"#;

        let results = parse_search_output(json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "ripgrep");
        assert_eq!(results[0].version, "14.1.0");
        assert_eq!(results[1].name, "ripgrep-all");
    }

    #[test]
    fn test_parse_nested_attribute() {
        let json = r#"{"legacyPackages.aarch64-darwin.python3Packages.black": {"version": "24.2.0"}}"#;
        let results = parse_search_output(json).unwrap();
        assert_eq!(results[0].name, "python3Packages.black");
        assert_eq!(results[0].description, "");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_search_output("").unwrap().is_empty());
        assert!(parse_search_output("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_output() {
        assert!(matches!(parse_search_output("error: flake"), Err(Error::Command(_))));
    }
}
