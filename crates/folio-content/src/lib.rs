//! Path resolution and content index for the Folio content server.
//!
//! This crate holds everything that touches untrusted request paths or walks
//! the serving root:
//!
//! - [`sanitize`] maps a request path suffix to a [`SanitizedPath`]
//! - [`extract_title`] derives a display title from a document's first line
//! - [`Indexer`] builds the ordered [`FolderGroup`] index of all documents
//! - [`list_gallery`] and [`list_galleries`] list the photos folder
//!
//! Nothing here keeps state between calls. Each request builds what it needs
//! from the filesystem and drops it afterwards.
//!
//! # Example
//!
//! ```ignore
//! use folio_content::{Indexer, TraversalPolicy, sanitize};
//!
//! let groups = Indexer::new("notes").build()?;
//! let path = sanitize(&groups[0].entries[0].link, TraversalPolicy::Reject)?;
//! let content = std::fs::read_to_string(path.resolve(Path::new("notes")))?;
//! ```

mod error;
mod gallery;
mod index;
mod link;
mod sanitize;
mod title;

pub use error::{IndexError, PathError};
pub use gallery::{Gallery, list_galleries, list_gallery};
pub use index::{DEFAULT_EXCLUDED, DEFAULT_EXTENSION, FolderGroup, IndexEntry, Indexer};
pub use link::{decode_link_path, encode_link_path};
pub use sanitize::{DOUBLE_DOT_TOKEN, SanitizedPath, TraversalPolicy, sanitize};
pub use title::{TITLE_PROBE_BYTES, extract_title};

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_index_links_resolve_to_same_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("travel").join("2024 summer");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("día uno+dos.md"), "# Day one\n").unwrap();
        fs::write(temp_dir.path().join("README.md"), "# Readme\n").unwrap();

        let groups = Indexer::new(temp_dir.path()).build().unwrap();

        for entry in groups.iter().flat_map(|g| &g.entries) {
            let path = sanitize(&entry.link, TraversalPolicy::Reject).unwrap();
            let resolved = path.resolve(temp_dir.path());
            assert!(resolved.is_file(), "{} did not resolve", entry.link);
            assert_eq!(path.to_url_path(), entry.path);
        }
    }

    #[test]
    fn test_traversal_request_stays_inside_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir(&root).unwrap();

        assert!(matches!(
            sanitize("../../etc/passwd", TraversalPolicy::Reject),
            Err(PathError::Traversal(_))
        ));

        let rewritten = sanitize("../../etc/passwd", TraversalPolicy::Rewrite).unwrap();
        let resolved = rewritten.resolve(&root);
        assert!(resolved.starts_with(&root));
        assert!(fs::read(resolved).is_err());
    }
}
