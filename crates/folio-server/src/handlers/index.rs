//! Index page.
//!
//! Lists every document grouped by folder, followed by the galleries of the
//! photos folder when it exists. Rebuilt from the filesystem on every request.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use folio_content::{FolderGroup, Gallery, list_galleries};
use folio_renderer::escape_markdown;

use crate::error::ServerError;
use crate::handlers::{ARTICLES_PREFIX, PHOTOS_PREFIX, blocking, respond};
use crate::state::AppState;

/// Horizontal rule between sections.
const RULE: &str = "------\n\n";

/// Handle GET /.
pub(crate) async fn get_index(State(state): State<Arc<AppState>>) -> Response {
    let worker = Arc::clone(&state);
    let result = blocking(move || {
        let groups = worker.indexer().build().map_err(ServerError::Index)?;
        let galleries = list_galleries(&worker.photos_root());
        Ok(index_markdown(&groups, galleries.as_deref()))
    })
    .await;

    let result = result.map(|markdown| Html(state.render_page(&markdown)).into_response());
    respond(&state, result)
}

/// Build the markdown source of the index page.
fn index_markdown(groups: &[FolderGroup], galleries: Option<&[Gallery]>) -> String {
    let mut md = String::from("# List of articles:\n\n");

    for group in groups {
        md.push_str(RULE);
        let _ = writeln!(
            md,
            "{} {}\n",
            "#".repeat(usize::from(group.level)),
            escape_markdown(&group.folder)
        );
        for entry in &group.entries {
            let _ = writeln!(
                md,
                "[{}]({ARTICLES_PREFIX}{})\n",
                escape_markdown(&entry.title),
                entry.link
            );
        }
    }
    md.push_str(RULE);

    if let Some(galleries) = galleries {
        md.push_str("# PHOTOS\n\n");
        for gallery in galleries {
            let _ = writeln!(
                md,
                "[{}]({PHOTOS_PREFIX}{})\n",
                escape_markdown(&gallery.name),
                gallery.link
            );
        }
        md.push_str(RULE);
    }

    md
}
