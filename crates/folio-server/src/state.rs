//! Application state.
//!
//! Shared, read-only state for all request handlers. Built once at startup.

use std::path::PathBuf;

use folio_content::{Indexer, TraversalPolicy};
use folio_renderer::{MarkdownRenderer, PageTemplate, TemplateError};

use crate::ServerConfig;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Serving root directory.
    pub(crate) root_dir: PathBuf,
    /// Gallery folder name under the root.
    pub(crate) photos_dir: String,
    /// Document extension without the dot.
    pub(crate) extension: String,
    /// Directory names skipped when indexing.
    pub(crate) exclude: Vec<String>,
    /// Handling of `..` in request paths.
    pub(crate) traversal: TraversalPolicy,
    /// Markdown renderer.
    pub(crate) renderer: MarkdownRenderer,
    /// Page wrapper.
    pub(crate) template: PageTemplate,
}

impl AppState {
    /// Build state from server configuration, loading the page template.
    pub(crate) fn from_config(config: &ServerConfig) -> Result<Self, TemplateError> {
        let template = match &config.template {
            Some(path) => PageTemplate::from_file(path)?,
            None => PageTemplate::default(),
        };

        Ok(Self {
            root_dir: config.root_dir.clone(),
            photos_dir: config.photos_dir.clone(),
            extension: config.extension.clone(),
            exclude: config.exclude.clone(),
            traversal: config.traversal,
            renderer: MarkdownRenderer::new(),
            template,
        })
    }

    /// Gallery root directory.
    pub(crate) fn photos_root(&self) -> PathBuf {
        self.root_dir.join(&self.photos_dir)
    }

    /// Indexer configured for the serving root.
    pub(crate) fn indexer(&self) -> Indexer {
        Indexer::new(&self.root_dir)
            .with_extension(&self.extension)
            .with_excluded(self.exclude.iter().map(String::as_str))
    }

    /// Render markdown into a full HTML page.
    pub(crate) fn render_page(&self, markdown: &str) -> String {
        self.template.wrap(&self.renderer.render(markdown))
    }
}
