//! Photo handler.
//!
//! `/photos/<gallery>` lists a gallery as a page of images.
//! `/photos/<gallery>/<file>` streams one image.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::{Html, IntoResponse, Response};
use folio_content::{SanitizedPath, encode_link_path, list_gallery};
use folio_renderer::escape_markdown;

use crate::error::ServerError;
use crate::handlers::{PHOTOS_PREFIX, blocking, respond, sanitize_suffix, serve_raw};
use crate::state::AppState;

/// Handle GET /photos/ and /photos/{*path}.
pub(crate) async fn get_photos(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let result = photos(&state, req).await;
    respond(&state, result)
}

async fn photos(state: &Arc<AppState>, req: Request) -> Result<Response, ServerError> {
    let path = sanitize_suffix(state, req.uri(), PHOTOS_PREFIX)?;

    if path.segment_count() > 1 {
        return serve_raw(&state.photos_root(), &path, req).await;
    }

    let photos_root = state.photos_root();
    let folder = path.clone();
    let files = blocking(move || {
        list_gallery(&photos_root, &folder).map_err(|source| ServerError::Gallery {
            gallery: folder.to_string(),
            source,
        })
    })
    .await?;

    Ok(Html(state.render_page(&gallery_markdown(&path, &files))).into_response())
}

/// Build the markdown source of a gallery page.
fn gallery_markdown(gallery: &SanitizedPath, files: &[String]) -> String {
    let name = gallery.to_url_path();
    let link = encode_link_path(&name);

    let mut md = String::from("[Main page](/)\n\n");
    let _ = writeln!(md, "{}\n", escape_markdown(&name));
    for file in files {
        let _ = writeln!(
            md,
            "![{}]({PHOTOS_PREFIX}{link}/{})\n",
            escape_markdown(file),
            encode_link_path(file)
        );
    }
    md
}
