//! Article handler.
//!
//! Documents are rendered into the page template. Any other file under the
//! serving root is streamed as-is.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::{Html, IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::{ARTICLES_PREFIX, require_file, respond, sanitize_suffix, serve_raw};
use crate::state::AppState;

/// Handle GET /articles/ and /articles/{*path}.
pub(crate) async fn get_article(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let result = article(&state, req).await;
    respond(&state, result)
}

async fn article(state: &AppState, req: Request) -> Result<Response, ServerError> {
    let path = sanitize_suffix(state, req.uri(), ARTICLES_PREFIX)?;

    if !path.is_document(&state.extension) {
        return serve_raw(&state.root_dir, &path, req).await;
    }

    let resolved = require_file(&state.root_dir, &path).await?;
    let bytes = tokio::fs::read(resolved)
        .await
        .map_err(|source| ServerError::File {
            path: path.to_string(),
            source,
        })?;
    let markdown = document_markdown(&String::from_utf8_lossy(&bytes));

    Ok(Html(state.render_page(&markdown)).into_response())
}

/// Document source with a link back to the index prepended.
fn document_markdown(content: &str) -> String {
    format!("[Main page](/)\n\n{content}")
}
