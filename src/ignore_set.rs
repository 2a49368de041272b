//! Resolution of the active ignore patterns for a traversal root.
//!
//! Patterns come from the built-in defaults, then the `.pewc` rules file at
//! the root, then anything the caller appends.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pattern::{matches, IgnorePattern};

/// Name of the project-local rules file, looked up at the root only.
pub const RULES_FILE_NAME: &str = ".pewc";

/// Built-in patterns, applied unless defaults are disabled.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".*",
    "node_modules/",
    "target/",
    "dist/",
    "build/",
    "bin/",
    "pkg/",
    RULES_FILE_NAME,
    ".git/",
];

/// Errors that can occur while resolving ignore patterns.
#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("failed to read rules file {path}: {source}")]
    RulesFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered set of ignore patterns. Any single match means "ignored".
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    /// Create an empty set that ignores nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding the built-in patterns.
    pub fn with_defaults() -> Self {
        Self::from_patterns(DEFAULT_IGNORE_PATTERNS.iter().copied())
    }

    /// Create a set from raw pattern strings, keeping their order.
    pub fn from_patterns<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<IgnorePattern>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Patterns in resolution order.
    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a root-relative path against every pattern.
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        self.patterns
            .iter()
            .any(|pattern| matches(relative, is_dir, pattern))
    }

    /// Check an absolute path found under `root`.
    ///
    /// This is the prune predicate shared by file collection and tree
    /// building. Paths outside `root` are matched as given.
    pub fn is_ignored_path(&self, root: &Path, path: &Path, is_dir: bool) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.is_ignored(&relative.to_string_lossy(), is_dir)
    }
}

impl Extend<IgnorePattern> for IgnoreSet {
    fn extend<T: IntoIterator<Item = IgnorePattern>>(&mut self, iter: T) {
        self.patterns.extend(iter);
    }
}

/// Parse the contents of a rules file.
///
/// Each line is trimmed; blank lines and `#` comments are dropped.
///
/// # Examples
///
/// ```
/// use pew::ignore_set::parse_rules;
///
/// let patterns = parse_rules("# generated\n\n  *.log \nvendor/\n");
/// let raw: Vec<_> = patterns.iter().map(|p| p.as_str()).collect();
/// assert_eq!(raw, ["*.log", "vendor/"]);
/// ```
pub fn parse_rules(text: &str) -> Vec<IgnorePattern> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(IgnorePattern::new)
        .collect()
}

/// Resolve the ignore set for `root`, with or without the built-in patterns.
pub fn resolve_ignore_set(root: &Path, use_defaults: bool) -> Result<IgnoreSet, IgnoreError> {
    let defaults: &[&str] = if use_defaults {
        DEFAULT_IGNORE_PATTERNS
    } else {
        &[]
    };
    resolve_ignore_set_with(root, defaults)
}

/// Resolve the ignore set for `root` starting from an explicit default list.
///
/// A missing rules file contributes nothing. A rules file that exists but
/// cannot be read is an error.
pub fn resolve_ignore_set_with(root: &Path, defaults: &[&str]) -> Result<IgnoreSet, IgnoreError> {
    let mut set = IgnoreSet::from_patterns(defaults.iter().copied());

    let rules_path = root.join(RULES_FILE_NAME);
    match std::fs::read(&rules_path) {
        Ok(bytes) => {
            let rules = parse_rules(&String::from_utf8_lossy(&bytes));
            log::debug!(
                "loaded {} pattern(s) from {}",
                rules.len(),
                rules_path.display()
            );
            set.extend(rules);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(IgnoreError::RulesFile {
                path: rules_path,
                source,
            })
        }
    }

    Ok(set)
}
