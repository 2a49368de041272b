//! Gitignore-style pattern matching.
//!
//! Supports literal segment matches, trailing-slash directory-only markers,
//! and `*`/`?` wildcards that never cross a `/`. There is no support for
//! negation or anchored patterns.

use std::borrow::Cow;
use std::fmt;

use glob::MatchOptions;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single ignore pattern, parsed once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    raw: String,
    /// Raw text without the trailing directory marker.
    body: String,
    directory_only: bool,
    has_wildcard: bool,
    /// `None` when the body is not a valid glob.
    glob: Option<glob::Pattern>,
}

impl IgnorePattern {
    /// Parse a pattern from its raw text.
    ///
    /// # Examples
    ///
    /// ```
    /// use pew::pattern::IgnorePattern;
    ///
    /// let p = IgnorePattern::new("node_modules/");
    /// assert!(p.is_directory_only());
    /// assert!(!p.has_wildcard());
    /// ```
    pub fn new(raw: impl Into<String>) -> Self {
        let raw: String = raw.into();
        let raw = to_slash(&raw).into_owned();
        let directory_only = raw.ends_with('/');
        let body = raw.strip_suffix('/').unwrap_or(&raw).to_string();
        let has_wildcard = raw.contains(['*', '?']);
        let glob = if has_wildcard {
            glob::Pattern::new(&body).ok()
        } else {
            None
        };

        Self {
            raw,
            body,
            directory_only,
            has_wildcard,
            glob,
        }
    }

    /// The pattern text as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if the pattern ends with `/` and only applies to directories.
    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// True if the pattern contains `*` or `?`.
    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    /// Convenience wrapper around [`matches`].
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        matches(path, is_dir, self)
    }
}

impl fmt::Display for IgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for IgnorePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for IgnorePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Decide whether a root-relative `path` matches `pattern`.
///
/// Wildcard patterns are tried against the whole path first and then against
/// each `/`-separated segment, so `*.log` matches a log file at any depth.
/// Literal patterns match the final segment or the whole path exactly.
///
/// # Examples
///
/// ```
/// use pew::pattern::{matches, IgnorePattern};
///
/// let log = IgnorePattern::new("*.log");
/// assert!(matches("dir/sub/c.log", false, &log));
/// assert!(!matches("a.logx", false, &log));
///
/// let target = IgnorePattern::new("target/");
/// assert!(matches("target", true, &target));
/// assert!(!matches("target", false, &target));
/// ```
pub fn matches(path: &str, is_dir: bool, pattern: &IgnorePattern) -> bool {
    if pattern.directory_only && !is_dir {
        return false;
    }

    let path = to_slash(path);

    if pattern.has_wildcard {
        let Some(glob) = &pattern.glob else {
            return false;
        };
        return glob.matches_with(&path, GLOB_OPTIONS)
            || path
                .split('/')
                .any(|segment| glob.matches_with(segment, GLOB_OPTIONS));
    }

    basename(&path) == pattern.body || path == pattern.body
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn to_slash(s: &str) -> Cow<'_, str> {
    if std::path::MAIN_SEPARATOR == '/' {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(path: &str, is_dir: bool, pattern: &str) -> bool {
        matches(path, is_dir, &IgnorePattern::new(pattern))
    }

    #[test]
    fn test_pattern_flags() {
        let p = IgnorePattern::new("build/");
        assert!(p.is_directory_only());
        assert!(!p.has_wildcard());
        assert_eq!(p.as_str(), "build/");

        let p = IgnorePattern::new("*.o");
        assert!(!p.is_directory_only());
        assert!(p.has_wildcard());

        assert!(IgnorePattern::new("file?.txt").has_wildcard());
    }

    #[test]
    fn test_directory_only_never_matches_files() {
        for path in ["target", "a/target", "node_modules", "x.txt"] {
            for pattern in ["target/", "node_modules/", "*/", "x.txt/", ".*/"] {
                assert!(!m(path, false, pattern), "{pattern} matched file {path}");
            }
        }
    }

    #[test]
    fn test_directory_only_matches_directories() {
        assert!(m("target", true, "target/"));
        assert!(m("crates/core/target", true, "target/"));
        assert!(m(".git", true, ".git/"));
        assert!(!m("targets", true, "target/"));
    }

    #[test]
    fn test_literal_matches_basename_or_full_path() {
        assert!(m("README.md", false, "README.md"));
        assert!(m("docs/README.md", false, "README.md"));
        assert!(m("docs/README.md", false, "docs/README.md"));
        assert!(!m("other/docs/README.md", false, "docs/README.md"));
        assert!(!m("README.markdown", false, "README.md"));
        assert!(!m("src/main.rs", false, "src"));
    }

    #[test]
    fn test_literal_is_exact_even_with_glob_metacharacters() {
        assert!(m("[ab]", false, "[ab]"));
        assert!(!m("a", false, "[ab]"));
    }

    #[test]
    fn test_wildcard_matches_at_any_depth() {
        assert!(m("a.log", false, "*.log"));
        assert!(m("dir/b.log", false, "*.log"));
        assert!(m("dir/sub/c.log", false, "*.log"));
        assert!(!m("a.logx", false, "*.log"));
    }

    #[test]
    fn test_wildcard_does_not_cross_separator() {
        assert!(m("doc/notes.txt", false, "doc/*.txt"));
        assert!(!m("doc/sub/notes.txt", false, "doc/*.txt"));
        assert!(!m("a/b", false, "a?b"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        assert!(m("file1.txt", false, "file?.txt"));
        assert!(!m("file10.txt", false, "file?.txt"));
        assert!(!m("file.txt", false, "file?.txt"));
    }

    #[test]
    fn test_hidden_pattern() {
        assert!(m(".git", true, ".*"));
        assert!(m(".env", false, ".*"));
        assert!(m("src/.hidden", false, ".*"));
        assert!(!m("src/main.rs", false, ".*"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!m("readme.md", false, "README.md"));
        assert!(!m("A.LOG", false, "*.log"));
    }

    #[test]
    fn test_malformed_glob_is_no_match() {
        let p = IgnorePattern::new("[*");
        assert!(p.has_wildcard());
        assert!(!p.matches("[*", false));
        assert!(!p.matches("anything", false));
    }

    #[test]
    fn test_display_round_trips_raw_text() {
        assert_eq!(IgnorePattern::from("dist/").to_string(), "dist/");
    }
}
