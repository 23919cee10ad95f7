//! Request path sanitization.
//!
//! Turns the untrusted suffix of a request URL (the part after `/articles/`
//! or `/photos/`) into a [`SanitizedPath`] that can be joined onto the
//! serving root. No filesystem access happens here.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;
use crate::link::decode_link_path;

/// Token substituted for `..` under [`TraversalPolicy::Rewrite`].
pub const DOUBLE_DOT_TOKEN: &str = "doubledot";

/// How parent-directory references in request paths are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Fail with [`PathError::Traversal`] when a `..` segment is present.
    #[default]
    Reject,
    /// Replace every `..` with [`DOUBLE_DOT_TOKEN`] and continue.
    Rewrite,
}

/// A request-derived path, relative to the serving root.
///
/// Never contains a `..` component and never starts with a separator,
/// root or drive prefix. Handlers only open files through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedPath(PathBuf);

impl SanitizedPath {
    /// Path relative to the serving root, using the native separator.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Path with `/` separators, as embedded in links and messages.
    pub fn to_url_path(&self) -> String {
        self.0
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Join onto a root directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// Number of path segments (`a` is 1, `a/b.jpg` is 2).
    pub fn segment_count(&self) -> usize {
        self.0
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
    }

    /// Whether the file name ends with `.{extension}`.
    pub fn is_document(&self, extension: &str) -> bool {
        self.0
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| has_extension(name, extension))
    }
}

impl fmt::Display for SanitizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url_path())
    }
}

impl AsRef<Path> for SanitizedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Whether `name` ends with `.{extension}`.
pub(crate) fn has_extension(name: &str, extension: &str) -> bool {
    name.strip_suffix(extension)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// Sanitize the raw, still percent-encoded path suffix of a request.
///
/// # Examples
///
/// ```
/// use folio_content::{TraversalPolicy, sanitize};
///
/// let path = sanitize("/notes/my%20day.md", TraversalPolicy::Reject).unwrap();
/// assert_eq!(path.to_url_path(), "notes/my day.md");
///
/// assert!(sanitize("../../etc/passwd", TraversalPolicy::Reject).is_err());
/// ```
pub fn sanitize(raw: &str, policy: TraversalPolicy) -> Result<SanitizedPath, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let decoded = decode_link_path(trimmed)?;
    let decoded = match policy {
        TraversalPolicy::Reject => {
            if decoded.split(['/', '\\']).any(|segment| segment == "..") {
                return Err(PathError::Traversal(decoded));
            }
            decoded
        }
        TraversalPolicy::Rewrite => decoded.replace("..", DOUBLE_DOT_TOKEN),
    };

    let relative = decoded.strip_prefix(['/', '\\']).unwrap_or(&decoded);

    // Repeated separators would otherwise leave the path rooted.
    let mut path = PathBuf::new();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }

    if path.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    if !path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(PathError::Traversal(decoded));
    }

    Ok(SanitizedPath(path))
}
