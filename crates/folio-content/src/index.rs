//! Content index built by walking the serving root.
//!
//! The walk uses an explicit worklist, so deep trees cannot exhaust the stack.
//! Every directory is listed once; the folder list and the documents in each
//! folder are then sorted by name, which makes the index deterministic for an
//! unchanged tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;
use crate::link::encode_link_path;
use crate::sanitize::has_extension;
use crate::title::extract_title;

/// Default document extension.
pub const DEFAULT_EXTENSION: &str = "md";

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDED: &[&str] = &[".git"];

/// Deepest heading level used for folder headings.
const MAX_HEADING_LEVEL: usize = 3;

/// One document in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Display title (first line of the document or its path).
    pub title: String,
    /// Slash-separated path relative to the root.
    pub path: String,
    /// `path` percent-encoded for use in a link.
    pub link: String,
    /// Directory depth of the containing folder (root is 0).
    pub depth: usize,
}

/// Documents of one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderGroup {
    /// Slash-separated folder path, `"."` for the root.
    pub folder: String,
    /// Heading level in `1..=3`.
    pub level: u8,
    /// Documents in filename order.
    pub entries: Vec<IndexEntry>,
}

/// Immediate child of a listed directory.
pub(crate) struct ChildEntry {
    pub name: String,
    pub is_dir: bool,
}

/// List the children of `dir`, skipping names that are not UTF-8.
///
/// File types come from the directory entry, so symlinks are not followed.
pub(crate) fn read_children(dir: &Path) -> Result<Vec<ChildEntry>, IndexError> {
    let entries = fs::read_dir(dir).map_err(|e| IndexError::read_dir(dir, e))?;

    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IndexError::read_dir(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| IndexError::read_dir(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => children.push(ChildEntry {
                name,
                is_dir: file_type.is_dir(),
            }),
            Err(name) => {
                tracing::warn!(dir = %dir.display(), name = ?name, "Skipping non UTF-8 name");
            }
        }
    }
    Ok(children)
}

/// Folder found during the walk.
struct Folder {
    /// Slash-separated path relative to the root, empty for the root.
    rel: String,
    depth: usize,
    documents: Vec<String>,
}

/// Builds the [`FolderGroup`] index of a content root.
///
/// # Example
///
/// ```ignore
/// use folio_content::Indexer;
///
/// let groups = Indexer::new("notes").build()?;
/// for group in &groups {
///     println!("{} ({} documents)", group.folder, group.entries.len());
/// }
/// ```
pub struct Indexer {
    root: PathBuf,
    extension: String,
    excluded: Vec<String>,
}

impl Indexer {
    /// Create an indexer for `root` with the default extension and exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
            excluded: DEFAULT_EXCLUDED.iter().map(|&s| s.to_owned()).collect(),
        }
    }

    /// Set the document extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replace the list of directory names to skip.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Walk the root and build the index.
    ///
    /// Fails on the first directory that cannot be listed.
    pub fn build(&self) -> Result<Vec<FolderGroup>, IndexError> {
        let folders = self.walk()?;
        let folder_count = folders.len();

        let groups: Vec<FolderGroup> = folders
            .into_iter()
            .filter(|folder| !folder.documents.is_empty())
            .map(|folder| self.folder_group(folder))
            .collect();

        tracing::debug!(
            root = %self.root.display(),
            folders = folder_count,
            groups = groups.len(),
            documents = groups.iter().map(|g| g.entries.len()).sum::<usize>(),
            "Built content index"
        );

        Ok(groups)
    }

    /// List every folder under the root, sorted by relative path.
    fn walk(&self) -> Result<Vec<Folder>, IndexError> {
        let mut folders = Vec::new();
        let mut pending = vec![(String::new(), 0)];

        while let Some((rel, depth)) = pending.pop() {
            let dir = self.dir_path(&rel);
            let mut documents = Vec::new();

            for child in read_children(&dir)? {
                if child.is_dir {
                    if self.excluded.iter().any(|name| *name == child.name) {
                        continue;
                    }
                    pending.push((join_rel(&rel, &child.name), depth + 1));
                } else if has_extension(&child.name, &self.extension) {
                    documents.push(child.name);
                }
            }

            documents.sort_unstable();
            folders.push(Folder {
                rel,
                depth,
                documents,
            });
        }

        folders.sort_unstable_by(|a, b| a.rel.cmp(&b.rel));
        Ok(folders)
    }

    fn folder_group(&self, folder: Folder) -> FolderGroup {
        let dir = self.dir_path(&folder.rel);
        let entries = folder
            .documents
            .iter()
            .map(|name| {
                let path = join_rel(&folder.rel, name);
                IndexEntry {
                    title: extract_title(&dir.join(name), &path),
                    link: encode_link_path(&path),
                    path,
                    depth: folder.depth,
                }
            })
            .collect();

        FolderGroup {
            folder: if folder.rel.is_empty() {
                ".".to_owned()
            } else {
                folder.rel
            },
            level: heading_level(folder.depth),
            entries,
        }
    }

    fn dir_path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

/// Heading level for a folder at `depth`: root is 1, capped at 3.
fn heading_level(depth: usize) -> u8 {
    u8::try_from((1 + depth).min(MAX_HEADING_LEVEL)).unwrap_or(u8::MAX)
}

fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}
