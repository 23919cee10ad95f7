//! Error types for path sanitization and index building.

use std::io;
use std::path::PathBuf;

/// Error produced while turning a request path into a [`SanitizedPath`](crate::SanitizedPath).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Nothing is left of the path after trimming.
    #[error("Path is empty")]
    Empty,
    /// The raw path has a malformed escape or is not UTF-8 once decoded.
    #[error("Cannot decode path `{0}`")]
    Decode(String),
    /// The path would leave the serving directory.
    #[error("Path `{0}` points outside the serving directory")]
    Traversal(String),
}

/// Error produced while listing the content tree.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A directory could not be listed.
    #[error("Cannot read directory `{}`: {source}", .path.display())]
    ReadDir {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl IndexError {
    pub(crate) fn read_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }
}
