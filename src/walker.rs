//! Directory traversal with ignore-pattern pruning.
//!
//! One pre-order pass over the root both collects text-eligible files and
//! builds the [`FileNode`] tree, so the two can never disagree about what
//! was pruned.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::filter::{BinaryReason, Classification, Classifier};
use crate::ignore_set::IgnoreSet;
use crate::tree::{FileNode, FileStatus};

/// Errors that abort a walk. Per-file problems never end up here.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => WalkError::NotFound { path },
            io::ErrorKind::PermissionDenied => WalkError::PermissionDenied { path },
            _ => WalkError::Io { path, source },
        }
    }
}

/// Why a non-ignored file was left out.
#[derive(Debug, Clone)]
pub enum SkipReason {
    Binary(BinaryReason),
    /// The file (or a directory below the root) could not be read.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Binary(reason) => write!(f, "binary ({})", reason),
            SkipReason::Unreadable(msg) => write!(f, "unreadable ({})", msg),
        }
    }
}

/// A file that survived pruning but is not part of the output.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Per-file result of classification.
#[derive(Debug)]
pub enum FileOutcome {
    Kept(PathBuf),
    Skipped(SkippedFile),
}

impl FileOutcome {
    /// Classify `path` and log anything that is left out.
    pub fn inspect(path: &Path, classifier: &Classifier) -> Self {
        match classifier.classify_file(path) {
            Ok(Classification::Text) => FileOutcome::Kept(path.to_path_buf()),
            Ok(Classification::Binary(reason)) => {
                log::info!("skipping binary file: {} ({})", path.display(), reason);
                FileOutcome::Skipped(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::Binary(reason),
                })
            }
            Err(e) => {
                log::warn!("could not check file type of {}: {}", path.display(), e);
                FileOutcome::Skipped(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::Unreadable(e.to_string()),
                })
            }
        }
    }

    /// Skip an entry that is not a regular file (or a link to one) without
    /// opening it. Opening a FIFO blocks until a writer shows up.
    fn special(entry: &DirEntry) -> Option<Self> {
        let file_type = entry.file_type();
        let reason = if file_type.is_file() {
            return None;
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => return None,
                Ok(_) => "not a regular file".to_string(),
                Err(e) => e.to_string(),
            }
        } else {
            "not a regular file".to_string()
        };

        log::warn!("skipping {}: {}", entry.path().display(), reason);
        Some(FileOutcome::Skipped(SkippedFile {
            path: entry.path().to_path_buf(),
            reason: SkipReason::Unreadable(reason),
        }))
    }

    fn status(&self) -> FileStatus {
        match self {
            FileOutcome::Kept(_) => FileStatus::Included,
            FileOutcome::Skipped(SkippedFile {
                reason: SkipReason::Binary(reason),
                ..
            }) => FileStatus::Binary(*reason),
            FileOutcome::Skipped(_) => FileStatus::Unreadable,
        }
    }
}

/// Everything one walk produces.
#[derive(Debug)]
pub struct WalkOutput {
    /// Absolute root the walk started from.
    pub root: PathBuf,
    /// Text-eligible files, sorted by path string.
    pub files: Vec<PathBuf>,
    /// Tree of every non-ignored entry.
    pub tree: FileNode,
    /// Files left out after pruning, in visit order.
    pub skipped: Vec<SkippedFile>,
}

impl WalkOutput {
    /// Kept files relative to the root.
    pub fn relative_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .map(|p| p.strip_prefix(&self.root).unwrap_or(p))
    }
}

/// Walk `root`, pruning with `ignore_set` and classifying with `classifier`.
///
/// Only failures at the root are errors. Unreadable files and subdirectories
/// are logged, recorded in [`WalkOutput::skipped`] and passed over.
///
/// # Examples
///
/// ```no_run
/// use pew::filter::Classifier;
/// use pew::ignore_set::IgnoreSet;
/// use pew::walker::walk;
/// use std::path::Path;
///
/// let output = walk(Path::new("/proj"), &IgnoreSet::with_defaults(), &Classifier::default()).unwrap();
/// for path in &output.files {
///     println!("{}", path.display());
/// }
/// ```
pub fn walk(
    root: &Path,
    ignore_set: &IgnoreSet,
    classifier: &Classifier,
) -> Result<WalkOutput, WalkError> {
    let root = resolve_root(root)?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(&root, entry, ignore_set));

    let mut tree = TreeBuilder::new(&root);
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                let path = err.path().unwrap_or(root.as_path()).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("walk failed at root"));
                return Err(WalkError::from_io(&path, source));
            }
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                log::warn!("could not read {}: {}", path.display(), err);
                skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::Unreadable(err.to_string()),
                });
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type().is_dir() {
            tree.enter(entry.depth(), FileNode::directory(name, entry.path()));
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let outcome = FileOutcome::special(&entry)
            .unwrap_or_else(|| FileOutcome::inspect(entry.path(), classifier));
        tree.add_file(
            entry.depth(),
            FileNode::file(name, entry.path(), size, outcome.status()),
        );

        match outcome {
            FileOutcome::Kept(path) => files.push(path),
            FileOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    Ok(WalkOutput {
        tree: tree.finish(),
        root,
        files,
        skipped,
    })
}

/// Make `root` absolute, fold away `.` and `..` lexically, and check that
/// it is a readable directory.
///
/// # Examples
///
/// ```no_run
/// use pew::walker::resolve_root;
/// use std::path::Path;
///
/// let root = resolve_root(Path::new("/proj/sub/..")).unwrap();
/// assert_eq!(root, Path::new("/proj"));
/// ```
pub fn resolve_root(root: &Path) -> Result<PathBuf, WalkError> {
    let absolute = std::path::absolute(root).map_err(|e| WalkError::from_io(root, e))?;
    let root = normalize(&absolute);

    let metadata = fs::metadata(&root).map_err(|e| WalkError::from_io(&root, e))?;
    if !metadata.is_dir() {
        return Err(WalkError::NotADirectory { path: root });
    }
    Ok(root)
}

/// `..` pops the previous component; it never climbs above the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Collect the text-eligible, non-ignored files under `root`, sorted.
pub fn collect_eligible_files(
    root: &Path,
    ignore_set: &IgnoreSet,
) -> Result<Vec<PathBuf>, WalkError> {
    walk(root, ignore_set, &Classifier::default()).map(|output| output.files)
}

/// Build the tree of non-ignored entries under `root`.
pub fn build_tree(root: &Path, ignore_set: &IgnoreSet) -> Result<FileNode, WalkError> {
    walk(root, ignore_set, &Classifier::default()).map(|output| output.tree)
}

/// The prune predicate. The root itself is never pruned.
fn is_pruned(root: &Path, entry: &DirEntry, ignore_set: &IgnoreSet) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry.file_type().is_dir();
    let pruned = ignore_set.is_ignored_path(root, entry.path(), is_dir);
    if pruned && is_dir {
        log::debug!("pruning {}", entry.path().display());
    }
    pruned
}

/// Assembles a tree from pre-order entries.
///
/// `open[i]` is the directory being filled at depth `i + 1`. An entry at
/// depth `d` first closes every open directory at depth `d` or deeper.
struct TreeBuilder {
    root: FileNode,
    open: Vec<FileNode>,
}

impl TreeBuilder {
    fn new(root: &Path) -> Self {
        let name = root.file_name().map_or_else(
            || root.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        );
        Self {
            root: FileNode::directory(name, root),
            open: Vec::new(),
        }
    }

    fn enter(&mut self, depth: usize, dir: FileNode) {
        self.close_to(depth);
        self.open.push(dir);
    }

    fn add_file(&mut self, depth: usize, file: FileNode) {
        self.close_to(depth);
        self.parent().add_child(file);
    }

    fn parent(&mut self) -> &mut FileNode {
        match self.open.last_mut() {
            Some(dir) => dir,
            None => &mut self.root,
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.open.len() >= depth.max(1) {
            let Some(done) = self.open.pop() else { break };
            self.parent().add_child(done);
        }
    }

    fn finish(mut self) -> FileNode {
        self.close_to(1);
        self.root
    }
}
