// src/nixfile/set.rs

//! In-memory package list

use std::fmt;

/// Ordered list of package names taken from a packages file
///
/// Parsing keeps document order and does not deduplicate. Mutations through
/// [`PackageSet::insert_sorted`] keep the list unique and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    names: Vec<String>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }

    /// Append without any checks (parser use)
    pub(crate) fn push(&mut self, name: String) {
        self.names.push(name);
    }

    /// Add `name`, sort ascending and drop repeated names.
    /// Returns false if `name` was already present.
    pub fn insert_sorted(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        self.names.sort();
        self.names.dedup();
        true
    }

    /// Copy of this set without `name`, keeping the remaining order
    pub fn without(&self, name: &str) -> PackageSet {
        self.names
            .iter()
            .filter(|n| n.as_str() != name)
            .cloned()
            .collect()
    }
}

impl FromIterator<String> for PackageSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for PackageSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl fmt::Display for PackageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sorted_keeps_order_and_uniqueness() {
        let mut set: PackageSet = ["ripgrep", "fzf", "neovim"].into_iter().collect();

        assert!(set.insert_sorted("bat"));
        assert_eq!(set.as_slice(), ["bat", "fzf", "neovim", "ripgrep"]);

        assert!(!set.insert_sorted("fzf"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_insert_sorted_collapses_repeats() {
        let mut set: PackageSet = ["jq", "ripgrep", "jq"].into_iter().collect();

        assert!(set.insert_sorted("bat"));
        assert_eq!(set.as_slice(), ["bat", "jq", "ripgrep"]);
    }

    #[test]
    fn test_without_preserves_order() {
        let set: PackageSet = ["ripgrep", "fzf", "neovim"].into_iter().collect();
        let after = set.without("fzf");
        assert_eq!(after.as_slice(), ["ripgrep", "neovim"]);
        assert_eq!(set.len(), 3);
    }
}
