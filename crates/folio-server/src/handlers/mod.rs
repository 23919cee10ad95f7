//! HTTP request handlers.

pub(crate) mod articles;
pub(crate) mod index;
pub(crate) mod photos;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use folio_content::{SanitizedPath, sanitize};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::ServerError;
use crate::state::AppState;

/// URL prefix for documents and raw files.
pub(crate) const ARTICLES_PREFIX: &str = "/articles/";

/// URL prefix for galleries and images.
pub(crate) const PHOTOS_PREFIX: &str = "/photos/";

/// Sanitize the part of the request path after `prefix`.
pub(crate) fn sanitize_suffix(
    state: &AppState,
    uri: &Uri,
    prefix: &str,
) -> Result<SanitizedPath, ServerError> {
    let request = uri.path();
    let suffix = request.strip_prefix(prefix).unwrap_or_default();
    sanitize(suffix, state.traversal).map_err(|source| ServerError::BadPath {
        request: request.to_owned(),
        source,
    })
}

/// Run blocking filesystem work off the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, ServerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

/// Fail with a not-found error unless `path` under `root` is a regular file.
pub(crate) async fn require_file(
    root: &Path,
    path: &SanitizedPath,
) -> Result<PathBuf, ServerError> {
    let resolved = path.resolve(root);
    let metadata = tokio::fs::metadata(&resolved)
        .await
        .map_err(|source| ServerError::File {
            path: path.to_string(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(ServerError::File {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a file"),
        });
    }
    Ok(resolved)
}

/// Stream `path` under `root` as a raw file.
///
/// Missing files and directories get the inline error page instead of an
/// empty 404 from the file service.
pub(crate) async fn serve_raw(
    root: &Path,
    path: &SanitizedPath,
    req: Request,
) -> Result<Response, ServerError> {
    let resolved = require_file(root, path).await?;
    Ok(ServeFile::new(resolved).oneshot(req).await.into_response())
}

/// Turn a handler result into a response, rendering errors inline.
pub(crate) fn respond(state: &AppState, result: Result<Response, ServerError>) -> Response {
    result.unwrap_or_else(|err| err.into_page(&state.template))
}

/// Handle requests no route matches.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    respond(&state, Err(ServerError::PageNotFound(uri.path().to_owned())))
}
