// src/nixfile/diff.rs

//! Before/after comparison of two package lists

use super::generator::{BLOCK_CLOSE, BLOCK_OPEN};
use super::set::PackageSet;
use std::fmt;

/// How a package changes between two lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Removed,
    Unchanged,
    Added,
}

impl Change {
    fn marker(self) -> &'static str {
        match self {
            Change::Removed => "-",
            Change::Unchanged => "",
            Change::Added => "+",
        }
    }
}

/// One line of a diff report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub change: Change,
    pub name: String,
}

/// Preview of a package list change
///
/// Removed entries come first in `before` order, followed by every entry of
/// `after` in `after` order. `Display` renders the block as it would appear
/// in the packages file, with `-`/`+` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    lines: Vec<DiffLine>,
}

impl DiffReport {
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.with_change(Change::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.with_change(Change::Removed)
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.change != Change::Unchanged)
    }

    fn with_change(&self, change: Change) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |l| l.change == change)
            .map(|l| l.name.as_str())
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " {}", BLOCK_OPEN)?;
        for line in &self.lines {
            writeln!(f, "{}\t{}", line.change.marker(), line.name)?;
        }
        write!(f, " {}", BLOCK_CLOSE)
    }
}

/// Compare two package lists
pub fn diff(before: &PackageSet, after: &PackageSet) -> DiffReport {
    let mut lines = Vec::with_capacity(before.len() + after.len());

    for name in before {
        if !after.contains(name) {
            lines.push(DiffLine {
                change: Change::Removed,
                name: name.clone(),
            });
        }
    }

    for name in after {
        let change = if before.contains(name) {
            Change::Unchanged
        } else {
            Change::Added
        };
        lines.push(DiffLine {
            change,
            name: name.clone(),
        });
    }

    DiffReport { lines }
}
