//! Token estimates for the generated document.
//!
//! Uses tiktoken-rs when the encoding loads, and a four-bytes-per-token
//! heuristic otherwise.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use tiktoken_rs::CoreBPE;

/// Tokenizer used for the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// cl100k_base: GPT-4, GPT-3.5-turbo
    #[default]
    Cl100kBase,
    /// o200k_base: GPT-4o
    O200kBase,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Cl100kBase => write!(f, "cl100k_base"),
            Encoding::O200kBase => write!(f, "o200k_base"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" => Ok(Encoding::Cl100kBase),
            "o200k" | "o200k_base" => Ok(Encoding::O200kBase),
            _ => Err(format!("unknown encoding: {}", s)),
        }
    }
}

static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();
static O200K: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn tokenizer(encoding: Encoding) -> Option<&'static CoreBPE> {
    match encoding {
        Encoding::Cl100kBase => CL100K
            .get_or_init(|| tiktoken_rs::cl100k_base().ok())
            .as_ref(),
        Encoding::O200kBase => O200K
            .get_or_init(|| tiktoken_rs::o200k_base().ok())
            .as_ref(),
    }
}

fn fallback_count(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Estimate the token count of `text`. Never fails.
///
/// # Examples
///
/// ```
/// use pew::tokens::{count_tokens, Encoding};
///
/// assert_eq!(count_tokens("", Encoding::default()), 0);
/// assert!(count_tokens("# Directory Structure", Encoding::O200kBase) > 0);
/// ```
pub fn count_tokens(text: &str, encoding: Encoding) -> usize {
    match tokenizer(encoding) {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => fallback_count(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(count_tokens("", Encoding::Cl100kBase), 0);
    }

    #[test]
    fn test_markdown_document() {
        let doc = "# File Contents\n\n## src/main.rs\n\n```rs\nfn main() {}\n```\n";
        let count = count_tokens(doc, Encoding::Cl100kBase);
        assert!(count > 5 && count < doc.len());
    }

    #[test]
    fn test_fallback_approximation() {
        assert_eq!(fallback_count(""), 0);
        assert_eq!(fallback_count("a"), 1);
        assert_eq!(fallback_count("abcd"), 1);
        assert_eq!(fallback_count("abcde"), 2);
    }

    #[test]
    fn test_encoding_round_trip() {
        for encoding in [Encoding::Cl100kBase, Encoding::O200kBase] {
            assert_eq!(encoding.to_string().parse::<Encoding>().unwrap(), encoding);
        }
        assert_eq!("O200K".parse::<Encoding>().unwrap(), Encoding::O200kBase);
        assert!("p50k".parse::<Encoding>().is_err());
    }
}
