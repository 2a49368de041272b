//! Error types for pew.

use std::path::PathBuf;

use crate::ignore_set::IgnoreError;
use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type for pew operations.
#[derive(Debug, thiserror::Error)]
pub enum PewError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("no input files provided")]
    NoInput,

    #[error("walk error: {0}")]
    Walk(WalkError),

    #[error("ignore rules: {0}")]
    Ignore(#[from] IgnoreError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl From<WalkError> for PewError {
    fn from(e: WalkError) -> Self {
        match e {
            WalkError::NotFound { path } => PewError::PathNotFound(path),
            WalkError::PermissionDenied { path } => PewError::PermissionDenied(path),
            WalkError::NotADirectory { path } => PewError::NotADirectory(path),
            other => PewError::Walk(other),
        }
    }
}

/// Map an error to its exit code.
pub fn exit_code(error: &PewError) -> i32 {
    match error {
        PewError::PathNotFound(_) => 3,
        PewError::PermissionDenied(_) => 4,
        PewError::NotADirectory(_) => 3,
        PewError::NoInput => 5,
        PewError::Walk(_) => 2,
        PewError::Ignore(_) => 1,
        PewError::Output(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_errors_flatten() {
        let e: PewError = WalkError::NotFound {
            path: PathBuf::from("/x"),
        }
        .into();
        assert!(matches!(e, PewError::PathNotFound(_)));
        assert_eq!(exit_code(&e), 3);

        let e: PewError = WalkError::Io {
            path: PathBuf::from("/x"),
            source: std::io::Error::other("boom"),
        }
        .into();
        assert_eq!(exit_code(&e), 2);
    }

    #[test]
    fn test_no_input_exit_code() {
        assert_eq!(exit_code(&PewError::NoInput), 5);
        assert_eq!(PewError::NoInput.to_string(), "no input files provided");
    }
}
