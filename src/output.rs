//! Markdown assembly and output.
//!
//! Formats the walk results (or an explicit file list) into one Markdown
//! document, writes it out, and serializes a JSON manifest of what was
//! included.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::filter::{Classification, Classifier};
use crate::tree::{render_tree, FileNode, FileStatus, NodeKind, RenderOptions};
use crate::walker::WalkOutput;

/// Errors that can occur while producing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A finished Markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    pub markdown: String,
    /// Files whose content made it into the document.
    pub files_written: usize,
    /// Files dropped while assembling (binary or unreadable).
    pub dropped: Vec<PathBuf>,
}

const NO_FILES_NOTICE: &str = "No text files found in the directory.\n";

// ============================================================================
// Document assembly
// ============================================================================

/// Assemble the document for a directory walk.
///
/// `tree` is the rendered tree text; it is embedded verbatim.
pub fn directory_document(root: &Path, files: &[PathBuf], tree: &str) -> Document {
    let mut markdown = String::with_capacity(8192);
    let mut files_written = 0;
    let mut dropped = Vec::new();

    markdown.push_str("# Directory Structure\n\n");
    markdown.push_str("```\n");
    markdown.push_str(tree);
    markdown.push_str("```\n\n");
    markdown.push_str("# File Contents\n\n");

    for path in files {
        let Ok(relative) = path.strip_prefix(root) else {
            log::warn!("{} is outside {}", path.display(), root.display());
            dropped.push(path.clone());
            continue;
        };

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("error reading file {}: {}", path.display(), e);
                dropped.push(path.clone());
                continue;
            }
        };

        push_file_section(&mut markdown, &slash_path(relative), path, &content);
        files_written += 1;
    }

    if files_written == 0 {
        markdown.push_str(NO_FILES_NOTICE);
    }

    Document {
        markdown,
        files_written,
        dropped,
    }
}

/// Assemble the document for a walk, rendering its tree for the header.
pub fn walk_document(output: &WalkOutput) -> Document {
    let tree = render_tree(&output.tree, &RenderOptions::document());
    directory_document(&output.root, &output.files, &tree)
}

/// Assemble the document for files named explicitly.
///
/// No ignore patterns apply. Each path is classified first; binary and
/// unreadable files are logged and dropped. Headings use the path as given.
pub fn files_document(paths: &[PathBuf], classifier: &Classifier) -> Document {
    let mut markdown = String::from("# Source Code Files\n\n");
    let mut files_written = 0;
    let mut dropped = Vec::new();

    for path in paths {
        match classifier.classify_file(path) {
            Ok(Classification::Text) => {}
            Ok(Classification::Binary(reason)) => {
                log::info!("skipping binary file: {} ({})", path.display(), reason);
                dropped.push(path.clone());
                continue;
            }
            Err(e) => {
                log::warn!("could not check file type of {}: {}", path.display(), e);
                dropped.push(path.clone());
                continue;
            }
        }

        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("error reading file {}: {}", path.display(), e);
                dropped.push(path.clone());
                continue;
            }
        };

        push_file_section(&mut markdown, &path.to_string_lossy(), path, &content);
        files_written += 1;
    }

    Document {
        markdown,
        files_written,
        dropped,
    }
}

fn push_file_section(out: &mut String, heading: &str, path: &Path, content: &[u8]) {
    out.push_str("## ");
    out.push_str(heading);
    out.push_str("\n\n```");
    out.push_str(&fence_language(path));
    out.push('\n');
    out.push_str(&sanitize_file_content(content));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n\n");
}

/// Code fence language for a file: whatever follows the last `.` in its
/// name, or `text`.
///
/// # Examples
///
/// ```
/// use pew::output::fence_language;
/// use std::path::Path;
///
/// assert_eq!(fence_language(Path::new("src/main.rs")), "rs");
/// assert_eq!(fence_language(Path::new(".bashrc")), "bashrc");
/// assert_eq!(fence_language(Path::new("Makefile")), "text");
/// ```
pub fn fence_language(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|name| {
            name.rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .filter(|ext| !ext.is_empty())
        })
        .unwrap_or_else(|| "text".to_string())
}

fn slash_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

// ============================================================================
// Sanitizers
// ============================================================================

/// Drop control bytes other than newline, tab and carriage return.
pub fn sanitize_file_content(content: &[u8]) -> String {
    let kept: Vec<u8> = content
        .iter()
        .copied()
        .filter(|&b| b >= 0x20 || matches!(b, b'\n' | b'\t' | b'\r'))
        .collect();
    String::from_utf8_lossy(&kept).into_owned()
}

/// Fold the branch glyphs `├`, `─` and `└` to ASCII across the whole
/// document. Every other character, `│` included, is left alone.
///
/// # Examples
///
/// ```
/// use pew::output::sanitize_document;
///
/// assert_eq!(sanitize_document("├── a │ b\n└── c\n"), "|-- a │ b\n`-- c\n");
/// ```
pub fn sanitize_document(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '├' => '|',
            '─' => '-',
            '└' => '`',
            other => other,
        })
        .collect()
}

// ============================================================================
// Writing
// ============================================================================

/// Write the document to `path`, creating or truncating it.
pub fn write_document(path: &Path, text: &str) -> Result<(), OutputError> {
    fs::write(path, text).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the document to any writer (stdout when the output is `-`).
pub fn write_to(mut writer: impl Write, text: &str) -> Result<(), OutputError> {
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|source| OutputError::Write {
            path: PathBuf::from("-"),
            source,
        })
}

// ============================================================================
// JSON manifest
// ============================================================================

/// Serializable summary of a walk.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub root: String,
    pub files: Vec<String>,
    pub skipped: Vec<ManifestSkip>,
    pub tree: ManifestNode,
}

#[derive(Debug, Serialize)]
pub struct ManifestSkip {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ManifestNode {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestNode>,
}

impl Manifest {
    pub fn from_walk(output: &WalkOutput) -> Self {
        let relative = |p: &Path| slash_path(p.strip_prefix(&output.root).unwrap_or(p));

        Self {
            root: output.root.display().to_string(),
            files: output.files.iter().map(|p| relative(p.as_path())).collect(),
            skipped: output
                .skipped
                .iter()
                .map(|s| ManifestSkip {
                    path: relative(s.path.as_path()),
                    reason: s.reason.to_string(),
                })
                .collect(),
            tree: manifest_node(&output.tree),
        }
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn manifest_node(node: &FileNode) -> ManifestNode {
    let (kind, size, status) = match &node.kind {
        NodeKind::Directory => ("directory", None, None),
        NodeKind::File { size, status } => {
            let status = match status {
                FileStatus::Included => "included",
                FileStatus::Binary(_) => "binary",
                FileStatus::Unreadable => "unreadable",
            };
            ("file", Some(*size), Some(status))
        }
    };

    ManifestNode {
        name: node.name.clone(),
        kind,
        size,
        status,
        children: node.children().iter().map(manifest_node).collect(),
    }
}
