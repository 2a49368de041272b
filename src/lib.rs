//! Pew - Dump source files or whole directory trees into one Markdown
//! document for LLM context windows.
//!
//! Pew walks a directory, prunes paths matching gitignore-style patterns,
//! drops binary files, renders a directory tree, and emits every remaining
//! file as a fenced code block.
//!
//! # Quick Start
//!
//! ```no_run
//! use pew::builder::Pew;
//!
//! let dump = Pew::new("./my-project")
//!     .ignore("*.lock")
//!     .build()
//!     .unwrap();
//!
//! println!("{} files, {} skipped", dump.output.files.len(), dump.output.skipped.len());
//! std::fs::write("source.md", dump.markdown()).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`pattern`] - Single-pattern gitignore-style matching
//! - [`ignore_set`] - Built-in defaults plus the `.pewc` rules file
//! - [`filter`] - Text/binary classification from leading bytes
//! - [`walker`] - Single-pass traversal building the file list and tree
//! - [`tree`] - File tree representation and rendering
//! - [`output`] - Markdown assembly, sanitizing and JSON manifest
//! - [`tokens`] - Token estimates for the generated document
//! - [`builder`] - Fluent API tying it together

pub mod pattern;
pub mod ignore_set;
pub mod filter;
pub mod errors;
pub mod tree;
pub mod walker;
pub mod output;
pub mod tokens;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{Dump, Pew};
pub use errors::PewError;
pub use filter::{Classification, Classifier};
pub use ignore_set::{resolve_ignore_set, IgnoreError, IgnoreSet};
pub use output::{Document, OutputError};
pub use pattern::{matches, IgnorePattern};
pub use tokens::{count_tokens, Encoding};
pub use tree::{FileNode, NodeKind, RenderOptions};
pub use walker::{collect_eligible_files, walk, WalkError, WalkOutput};
