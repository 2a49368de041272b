//! Text/binary classification from a file's leading bytes.
//!
//! This is a heuristic, not a MIME sniffer: a handful of magic numbers,
//! a NUL byte count and a ratio of high bytes. The file extension plays
//! no part in the decision.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

/// A magic byte sequence identifying a binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub magic: &'static [u8],
}

/// Signatures checked against the start of every file.
pub const BINARY_SIGNATURES: &[Signature] = &[
    Signature { name: "ELF", magic: &[0x7F, 0x45, 0x4C, 0x46] },
    Signature { name: "PE", magic: &[0x4D, 0x5A] },
    Signature { name: "ZIP", magic: &[0x50, 0x4B, 0x03, 0x04] },
    Signature { name: "JPEG", magic: &[0xFF, 0xD8, 0xFF] },
    Signature { name: "PNG", magic: &[0x89, 0x50, 0x4E, 0x47] },
    Signature { name: "PDF", magic: &[0x25, 0x50, 0x44, 0x46] },
    Signature { name: "GZIP", magic: &[0x1F, 0x8B] },
];

/// Why a file was judged binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryReason {
    /// Leading bytes match a known format.
    Signature(&'static str),
    /// More NUL bytes than text tolerates.
    NulBytes(usize),
    /// Too large a share of bytes above 0x7F.
    NonAscii { count: usize, total: usize },
}

impl fmt::Display for BinaryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryReason::Signature(name) => write!(f, "{} signature", name),
            BinaryReason::NulBytes(n) => write!(f, "{} NUL bytes", n),
            BinaryReason::NonAscii { count, total } => {
                write!(f, "{}/{} non-ASCII bytes", count, total)
            }
        }
    }
}

/// Outcome of classifying a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Text,
    Binary(BinaryReason),
}

impl Classification {
    pub fn is_text(&self) -> bool {
        matches!(self, Classification::Text)
    }

    pub fn is_binary(&self) -> bool {
        !self.is_text()
    }
}

/// Content classifier holding the signature table and thresholds.
///
/// Build one with [`Classifier::default`] and pass it to the walker.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Magic numbers that mark a file as binary.
    pub signatures: Vec<Signature>,
    /// Leading bytes to read.
    pub sniff_len: usize,
    /// NUL bytes tolerated before a file counts as binary.
    pub max_nul_bytes: usize,
    /// Largest share of bytes above 0x7F that still counts as text.
    pub max_non_ascii_ratio: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            signatures: BINARY_SIGNATURES.to_vec(),
            sniff_len: SNIFF_LEN,
            max_nul_bytes: 1,
            max_non_ascii_ratio: 0.3,
        }
    }
}

impl Classifier {
    /// Classify a buffer of leading bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use pew::filter::Classifier;
    ///
    /// let classifier = Classifier::default();
    /// assert!(classifier.classify(b"fn main() {}\n").is_text());
    /// assert!(classifier.classify(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]).is_binary());
    /// ```
    pub fn classify(&self, head: &[u8]) -> Classification {
        if let Some(sig) = self.signatures.iter().find(|s| head.starts_with(s.magic)) {
            return Classification::Binary(BinaryReason::Signature(sig.name));
        }

        let nul = bytecount::count(head, 0);
        if nul > self.max_nul_bytes {
            return Classification::Binary(BinaryReason::NulBytes(nul));
        }

        let non_ascii = head.iter().filter(|&&b| b > 0x7F).count();
        if !head.is_empty() && non_ascii as f64 / head.len() as f64 > self.max_non_ascii_ratio {
            return Classification::Binary(BinaryReason::NonAscii {
                count: non_ascii,
                total: head.len(),
            });
        }

        Classification::Text
    }

    /// Read the leading bytes of `path` and classify them.
    pub fn classify_file(&self, path: &Path) -> io::Result<Classification> {
        let head = read_head(path, self.sniff_len)?;
        Ok(self.classify(&head))
    }

    /// True if `path` looks like text and may be included.
    pub fn is_text_eligible(&self, path: &Path) -> io::Result<bool> {
        self.classify_file(path).map(|c| c.is_text())
    }
}

/// Read at most `limit` bytes from the start of a file.
fn read_head(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut head)?;
    Ok(head)
}

/// Classify `path` with the default classifier.
pub fn is_text_eligible(path: &Path) -> io::Result<bool> {
    Classifier::default().is_text_eligible(path)
}
