//! Fluent builder API for pew.
//!
//! Provides both function composition and builder-style APIs for dumping
//! a directory into a Markdown document.

use std::path::{Path, PathBuf};

use crate::errors::PewError;
use crate::filter::Classifier;
use crate::ignore_set::{resolve_ignore_set, IgnoreSet};
use crate::output::{files_document, sanitize_document, walk_document, Document, Manifest};
use crate::pattern::IgnorePattern;
use crate::tree::{render_tree, RenderOptions};
use crate::walker::{resolve_root, walk, WalkOutput};

/// Builder for dumping a directory.
///
/// # Examples
///
/// ```no_run
/// use pew::builder::Pew;
///
/// let dump = Pew::new("./project")
///     .default_ignores(true)
///     .ignore("*.snap")
///     .build()
///     .unwrap();
///
/// println!("{} files", dump.output.files.len());
/// print!("{}", dump.markdown());
/// ```
pub struct Pew {
    root: PathBuf,
    use_defaults: bool,
    extra_patterns: Vec<IgnorePattern>,
    classifier: Classifier,
}

impl Pew {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            use_defaults: true,
            extra_patterns: Vec::new(),
            classifier: Classifier::default(),
        }
    }

    /// Apply the built-in ignore patterns (default: true).
    pub fn default_ignores(mut self, enabled: bool) -> Self {
        self.use_defaults = enabled;
        self
    }

    /// Append a pattern after the defaults and the rules file.
    pub fn ignore(mut self, pattern: impl Into<IgnorePattern>) -> Self {
        self.extra_patterns.push(pattern.into());
        self
    }

    /// Replace the content classifier.
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve the ignore set and walk the root.
    pub fn build(self) -> Result<Dump, PewError> {
        let root = resolve_root(&self.root)?;

        let mut ignore_set = resolve_ignore_set(&root, self.use_defaults)?;
        ignore_set.extend(self.extra_patterns);
        log::debug!(
            "ignore patterns: {:?}",
            ignore_set
                .patterns()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
        );

        let output = walk(&root, &ignore_set, &self.classifier)?;
        Ok(Dump { ignore_set, output })
    }
}

/// Result of walking a directory.
#[derive(Debug)]
pub struct Dump {
    /// Patterns the walk was pruned with.
    pub ignore_set: IgnoreSet,
    pub output: WalkOutput,
}

impl Dump {
    /// Tree rendered with the given options.
    pub fn tree_text(&self, options: &RenderOptions) -> String {
        render_tree(&self.output.tree, options)
    }

    /// Assemble the Markdown document (unsanitized).
    pub fn document(&self) -> Document {
        walk_document(&self.output)
    }

    /// The final Markdown text, branch glyphs folded to ASCII.
    pub fn markdown(&self) -> String {
        sanitize_document(&self.document().markdown)
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::from_walk(&self.output)
    }
}

// ============================================================================
// Functional API
// ============================================================================

/// Walk `root` with or without the built-in ignore patterns.
pub fn dump_directory(root: impl AsRef<Path>, use_defaults: bool) -> Result<Dump, PewError> {
    Pew::new(root.as_ref()).default_ignores(use_defaults).build()
}

/// Build the Markdown document for explicitly named files.
///
/// No input files is an error.
pub fn dump_files(paths: &[PathBuf], classifier: &Classifier) -> Result<Document, PewError> {
    if paths.is_empty() {
        return Err(PewError::NoInput);
    }
    let mut document = files_document(paths, classifier);
    document.markdown = sanitize_document(&document.markdown);
    Ok(document)
}
