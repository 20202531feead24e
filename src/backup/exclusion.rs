//! Exclusion policy for archive creation
//!
//! An entry is excluded when any configured pattern occurs as a substring of
//! its archive path, which is the source directory's own name followed by
//! the entry's path relative to the source, joined with `/`. Matching is
//! case-sensitive and ignores nesting depth, so `.git` excludes `proj/.git`,
//! `proj/vendor/lib/.git/HEAD` and also `proj/.gitignore`.

use std::path::{Component, Path};

use crate::error::{SnapError, SnapResult};

/// Patterns used when the settings don't provide their own
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] =
    &[".git", "__pycache__", ".pyc", "venv", ".pytest_cache"];

/// Ordered set of substring patterns deciding which entries are skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    patterns: Vec<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ExclusionPolicy {
    /// Build a policy from explicit patterns
    ///
    /// Empty patterns are rejected: the empty substring occurs in every path.
    pub fn new<I, S>(patterns: I) -> SnapResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::empty();
        for pattern in patterns {
            policy.push(pattern)?;
        }
        Ok(policy)
    }

    /// A policy that excludes nothing
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a pattern, ignoring exact duplicates
    pub fn push(&mut self, pattern: impl Into<String>) -> SnapResult<()> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(SnapError::Validation(
                "Exclusion patterns must not be empty".into(),
            ));
        }
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        Ok(())
    }

    /// Configured patterns, in order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check an archive path (`/`-separated)
    pub fn matches(&self, archive_path: &str) -> bool {
        self.first_match(archive_path).is_some()
    }

    /// First pattern that matches the archive path, if any
    pub fn first_match(&self, archive_path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| archive_path.contains(p.as_str()))
            .map(String::as_str)
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn to_archive_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_patterns() {
        let policy = ExclusionPolicy::default();
        assert!(policy.matches("proj/.git"));
        assert!(policy.matches("proj/.git/objects/ab"));
        assert!(policy.matches("proj/src/__pycache__"));
        assert!(policy.matches("proj/src/mod.pyc"));
        assert!(policy.matches("proj/venv/bin/python"));
        assert!(policy.matches("proj/.pytest_cache"));
        assert!(!policy.matches("proj/src/main.py"));
        assert!(!policy.matches("proj/README.md"));
    }

    #[test]
    fn test_matching_is_substring_at_any_depth() {
        let policy = ExclusionPolicy::new(["build"]).unwrap();
        assert!(policy.matches("a/b/c/build/out"));
        assert!(policy.matches("a/rebuild.sh"));
        assert!(policy.matches("build"));
    }

    #[test]
    fn test_source_name_is_matched_too() {
        let policy = ExclusionPolicy::default();
        assert!(policy.matches("venv-tools"));
        assert!(policy.matches("venv-tools/readme.txt"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let policy = ExclusionPolicy::new(["Cache"]).unwrap();
        assert!(policy.matches("proj/Cache"));
        assert!(!policy.matches("proj/cache"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = ExclusionPolicy::new(["ok", ""]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_push_dedups() {
        let mut policy = ExclusionPolicy::empty();
        policy.push("target").unwrap();
        policy.push("target").unwrap();
        policy.push("node_modules").unwrap();
        assert_eq!(policy.patterns(), ["target", "node_modules"]);
        assert_eq!(policy.first_match("x/node_modules/y"), Some("node_modules"));
    }

    #[test]
    fn test_empty_policy_matches_nothing() {
        let policy = ExclusionPolicy::empty();
        assert!(!policy.matches("proj/.git"));
    }

    #[test]
    fn test_to_archive_path() {
        let path: PathBuf = ["proj", "src", "lib.rs"].iter().collect();
        assert_eq!(to_archive_path(&path), "proj/src/lib.rs");
        assert!(ExclusionPolicy::new(["src/lib"])
            .unwrap()
            .matches(&to_archive_path(&path)));
    }
}
