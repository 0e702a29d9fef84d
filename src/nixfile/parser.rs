// src/nixfile/parser.rs

//! Extracts the package list from a packages file
//!
//! Only one construct is recognized:
//!
//! ```text
//! home.packages = with pkgs; [
//!   ripgrep
//!   fzf # fuzzy finder
//! ];
//! ```
//!
//! Everything else in the document is ignored.

use super::set::PackageSet;

const ATTRIBUTE: &str = "home.packages";
const COMMENT: char = '#';
const BLOCK_END: &str = "];";

/// Parse the package names out of a document
///
/// A document without a recognizable block yields an empty set.
pub fn parse(document: &str) -> PackageSet {
    match find_block(document) {
        Some(body) => parse_body(body),
        None => PackageSet::new(),
    }
}

/// Locate the body between `[` and the first following `];`
fn find_block(document: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(pos) = document[offset..].find(ATTRIBUTE) {
        let start = offset + pos + ATTRIBUTE.len();
        if let Some(body_start) = match_header(&document[start..]) {
            let body = &document[start + body_start..];
            return body.find(BLOCK_END).map(|end| &body[..end]);
        }
        offset = start;
    }
    None
}

/// Match `= with pkgs; [` (whitespace-insensitive) at the start of `rest`.
/// Returns the byte offset just past `[`.
fn match_header(rest: &str) -> Option<usize> {
    let mut cursor = Cursor::new(rest);
    cursor.skip_whitespace();
    cursor.expect("=")?;
    cursor.skip_whitespace();
    cursor.expect("with")?;
    if cursor.skip_whitespace() == 0 {
        return None;
    }
    cursor.expect("pkgs;")?;
    cursor.skip_whitespace();
    cursor.expect("[")?;
    Some(cursor.pos)
}

fn parse_body(body: &str) -> PackageSet {
    let mut packages = PackageSet::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        let line = match line.find(COMMENT) {
            Some(idx) => line[..idx].trim(),
            None => line,
        };

        if !line.is_empty() {
            packages.push(line.to_string());
        }
    }

    packages
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn skip_whitespace(&mut self) -> usize {
        let rest = &self.text[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        skipped
    }

    fn expect(&mut self, token: &str) -> Option<()> {
        if self.text[self.pos..].starts_with(token) {
            self.pos += token.len();
            Some(())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_document_order() {
        let doc = "{ pkgs, ... }: {\n  home.packages = with pkgs; [\n    ripgrep\n    fzf\n    neovim\n  ];\n}\n";
        assert_eq!(parse(doc).as_slice(), ["ripgrep", "fzf", "neovim"]);
    }

    #[test]
    fn test_parse_comment_only_block_is_empty() {
        let doc = "{ pkgs, ... }: {\n  home.packages = with pkgs; [\n    # No packages\n  ];\n}\n";
        assert!(parse(doc).is_empty());
    }

    #[test]
    fn test_parse_missing_block_is_empty() {
        assert!(parse("{ pkgs, ... }: { programs.git.enable = true; }").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_strips_trailing_comments() {
        let doc = "home.packages = with pkgs; [\n  ripgrep # search\n  # fzf\n\n  bat#cat clone\n];";
        assert_eq!(parse(doc).as_slice(), ["ripgrep", "bat"]);
    }

    #[test]
    fn test_parse_whitespace_insensitive_header() {
        let doc = "home.packages=with\tpkgs;[\nhtop\n];";
        assert_eq!(parse(doc).as_slice(), ["htop"]);

        let doc = "home.packages   =   with   pkgs;\n\n  [ jq\n  ];";
        assert_eq!(parse(doc).as_slice(), ["jq"]);
    }

    #[test]
    fn test_parse_requires_space_after_with() {
        assert!(parse("home.packages = withpkgs; [\n jq\n];").is_empty());
    }

    #[test]
    fn test_parse_skips_unmatched_occurrences() {
        let doc = "# home.packages are listed below\nhome.packages = with pkgs; [\n  jq\n];";
        assert_eq!(parse(doc).as_slice(), ["jq"]);
    }

    #[test]
    fn test_parse_stops_at_first_block_end() {
        let doc = "home.packages = with pkgs; [\n  jq\n];\nother = [\n  x\n];";
        assert_eq!(parse(doc).as_slice(), ["jq"]);
    }

    #[test]
    fn test_parse_unterminated_block_is_empty() {
        assert!(parse("home.packages = with pkgs; [\n  jq\n").is_empty());
    }

    #[test]
    fn test_parse_does_not_deduplicate() {
        let doc = "home.packages = with pkgs; [\n  jq\n  jq\n];";
        assert_eq!(parse(doc).as_slice(), ["jq", "jq"]);
    }
}
