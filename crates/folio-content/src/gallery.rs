//! Photo gallery listings.
//!
//! The photos folder holds one sub-folder per gallery. Listings are sorted by
//! name instead of relying on the platform's directory order.

use std::path::Path;

use crate::error::IndexError;
use crate::index::read_children;
use crate::link::encode_link_path;
use crate::sanitize::SanitizedPath;

/// A gallery folder under the photos root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    /// Folder name.
    pub name: String,
    /// `name` percent-encoded for use in a link.
    pub link: String,
}

/// List the files of one gallery, sorted by file name.
///
/// Only the immediate files of `photos_root/folder` are returned;
/// sub-folders are left to the caller.
pub fn list_gallery(
    photos_root: &Path,
    folder: &SanitizedPath,
) -> Result<Vec<String>, IndexError> {
    let mut files: Vec<String> = read_children(&folder.resolve(photos_root))?
        .into_iter()
        .filter(|child| !child.is_dir)
        .map(|child| child.name)
        .collect();
    files.sort_unstable();
    Ok(files)
}

/// List the galleries under `photos_root`.
///
/// Returns `None` when the photos folder cannot be read, so callers can omit
/// the section entirely.
pub fn list_galleries(photos_root: &Path) -> Option<Vec<Gallery>> {
    let children = match read_children(photos_root) {
        Ok(children) => children,
        Err(e) => {
            tracing::debug!(error = %e, "No photos folder");
            return None;
        }
    };

    let mut galleries: Vec<Gallery> = children
        .into_iter()
        .filter(|child| child.is_dir)
        .map(|child| Gallery {
            link: encode_link_path(&child.name),
            name: child.name,
        })
        .collect();
    galleries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    Some(galleries)
}
