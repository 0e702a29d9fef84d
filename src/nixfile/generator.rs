// src/nixfile/generator.rs

//! Renders the canonical packages file

/// Placeholder emitted when the package list is empty
pub const EMPTY_PLACEHOLDER: &str = "# Packages installed with focus";

/// Opening line of the package block, shared with the diff renderer
pub(crate) const BLOCK_OPEN: &str = "home.packages = with pkgs; [";

/// Closing line of the package block
pub(crate) const BLOCK_CLOSE: &str = "];";

/// Generate a packages file listing `packages` in the given order
///
/// Output is deterministic; callers pass the list already sorted.
pub fn generate<S: AsRef<str>>(packages: &[S]) -> String {
    let mut out = String::from("{ pkgs, ... }: {\n");
    out.push('\t');
    out.push_str(BLOCK_OPEN);
    out.push('\n');

    if packages.is_empty() {
        out.push('\t');
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
    } else {
        for pkg in packages {
            out.push('\t');
            out.push_str(pkg.as_ref());
            out.push('\n');
        }
    }

    out.push('\t');
    out.push_str(BLOCK_CLOSE);
    out.push('\n');
    out.push_str("}\n");
    out
}
