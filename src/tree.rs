//! File tree representation and rendering.
//!
//! The walker builds a [`FileNode`] tree from the same entries it collects
//! files from, so the rendered tree shows exactly what survived pruning.

use std::path::PathBuf;

use crate::filter::BinaryReason;

/// What became of a file that survived pruning.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Text-eligible, its content goes into the document.
    Included,
    /// Classified as binary.
    Binary(BinaryReason),
    /// Could not be opened or read for classification.
    Unreadable,
}

/// The type of a filesystem node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Directory,
    File { size: u64, status: FileStatus },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A node in the file tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name (not full path).
    pub name: String,
    /// Absolute path.
    pub path: PathBuf,
    /// Type of node (file or directory).
    pub kind: NodeKind,
    /// Child nodes (empty for files).
    children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new directory node.
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    /// Create a new file node.
    pub fn file(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        size: u64,
        status: FileStatus,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File { size, status },
            children: Vec::new(),
        }
    }

    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Add a child node. Only valid for directories.
    pub fn add_child(&mut self, child: FileNode) {
        self.children.push(child);
    }

    /// Get child nodes.
    pub fn children(&self) -> &[FileNode] {
        &self.children
    }

    /// File status if this is a file.
    pub fn status(&self) -> Option<&FileStatus> {
        match &self.kind {
            NodeKind::File { status, .. } => Some(status),
            NodeKind::Directory => None,
        }
    }

    /// Get file size if this is a file.
    pub fn size(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::File { size, .. } => Some(*size),
            NodeKind::Directory => None,
        }
    }

    /// Count total files in this tree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory => self.children.iter().map(|c| c.file_count()).sum(),
        }
    }

    /// Count total directories in this tree.
    pub fn directory_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 0,
            NodeKind::Directory => {
                1 + self.children.iter().map(|c| c.directory_count()).sum::<usize>()
            }
        }
    }
}

/// Options for rendering the tree.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Show file sizes.
    pub show_size: bool,
    /// Mark files that were left out of the document.
    pub show_status: bool,
    /// Connector characters.
    pub glyphs: Glyphs,
}

impl RenderOptions {
    /// Create options with all metadata enabled.
    pub fn with_metadata() -> Self {
        Self {
            show_size: true,
            show_status: true,
            glyphs: Glyphs::BOX,
        }
    }

    /// Names only, box-drawing connectors.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Names only, plain ASCII connectors, as embedded in the document.
    pub fn document() -> Self {
        Self {
            glyphs: Glyphs::ASCII,
            ..Self::default()
        }
    }
}

/// The four prefixes a tree line is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub branch: &'static str,
    pub last_branch: &'static str,
    pub vertical: &'static str,
    pub space: &'static str,
}

impl Glyphs {
    pub const BOX: Glyphs = Glyphs {
        branch: "├── ",
        last_branch: "└── ",
        vertical: "│   ",
        space: "    ",
    };

    pub const ASCII: Glyphs = Glyphs {
        branch: "|-- ",
        last_branch: "`-- ",
        vertical: "|   ",
        space: "    ",
    };
}

impl Default for Glyphs {
    fn default() -> Self {
        Glyphs::BOX
    }
}

/// Render a file tree to a string with the connectors in `options`.
///
/// # Examples
///
/// ```
/// use pew::tree::{FileNode, FileStatus, RenderOptions, render_tree};
///
/// let mut root = FileNode::directory("project", "/project");
/// root.add_child(FileNode::file("main.rs", "/project/main.rs", 1024, FileStatus::Included));
///
/// let output = render_tree(&root, &RenderOptions::minimal());
/// assert_eq!(output, "project/\n└── main.rs\n");
/// ```
pub fn render_tree(root: &FileNode, options: &RenderOptions) -> String {
    let mut output = String::with_capacity(4096);
    render_node(&mut output, root, "", true, true, options);
    output
}

fn render_node(
    output: &mut String,
    node: &FileNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    options: &RenderOptions,
) {
    let glyphs = &options.glyphs;
    let branch = if is_root {
        ""
    } else if is_last {
        glyphs.last_branch
    } else {
        glyphs.branch
    };

    output.push_str(prefix);
    output.push_str(branch);
    output.push_str(&node.name);

    if node.is_directory() {
        output.push('/');
    }

    if let NodeKind::File { size, status } = &node.kind {
        let mut metadata = Vec::new();

        if options.show_size {
            metadata.push(format_size(*size));
        }

        if options.show_status {
            match status {
                FileStatus::Included => {}
                FileStatus::Binary(_) => metadata.push("binary".to_string()),
                FileStatus::Unreadable => metadata.push("unreadable".to_string()),
            }
        }

        if !metadata.is_empty() {
            output.push_str(" [");
            output.push_str(&metadata.join(", "));
            output.push(']');
        }
    }

    output.push('\n');

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == child_count - 1;

        // Root's children have no prefix before their branch
        let new_prefix = if is_root {
            String::new()
        } else {
            let continuation = if is_last {
                glyphs.space
            } else {
                glyphs.vertical
            };
            format!("{}{}", prefix, continuation)
        };

        render_node(output, child, &new_prefix, is_last_child, false, options);
    }
}

/// Format file size for display.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    }
}

/// Format number with thousands separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
