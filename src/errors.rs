//! Error types for the asyncsuffix-linter library.
//!
//! Every failure a lint or fix invocation can hit is a variant here. Fix-path
//! errors are recoverable: a failing fix is skipped and the workspace is left
//! untouched.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main result type for linter operations.
pub type Result<T> = std::result::Result<T, LintError>;

#[derive(Error, Debug)]
pub enum LintError {
    /// File system errors while reading sources or writing fixes
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The parser produced no tree for a file
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A reported location does not resolve to a method declaration
    #[error("no method declaration encloses offset {offset} in {path}")]
    StructuralMismatch { path: PathBuf, offset: usize },

    /// Re-resolving the method symbol after the structural edit failed
    #[error("could not re-resolve method '{name}' in {path} after editing")]
    SymbolResolutionFailure { path: PathBuf, name: String },

    /// Stripping the suffix would leave an unusable method name
    #[error("stripping 'Async' from '{original}' leaves '{stripped}', which is not a valid identifier")]
    InvalidIdentifierAfterStrip { original: String, stripped: String },

    /// A cancellation request was observed at a check point
    #[error("operation cancelled")]
    Cancelled,

    /// Invariant violations that indicate a bug rather than bad input
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl LintError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
