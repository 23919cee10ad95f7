//! Error types for the HTTP server.
//!
//! Errors are shown inside the regular page layout as an inline
//! `Error: …` paragraph, with a status code matching the failure.

use std::io;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use folio_content::{IndexError, PathError};
use folio_renderer::{PageTemplate, escape_html};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Request path could not be sanitized.
    #[error("Cannot open page `{request}`: {source}")]
    BadPath {
        /// Request URL path.
        request: String,
        /// Sanitizer failure.
        source: PathError,
    },

    /// Index build failed.
    #[error("Cannot build index: {0}")]
    Index(#[from] IndexError),

    /// Gallery folder could not be listed.
    #[error("Cannot open gallery `{gallery}`: {source}")]
    Gallery {
        /// Gallery path as requested.
        gallery: String,
        /// Listing failure.
        source: IndexError,
    },

    /// File could not be read.
    #[error("Cannot read file `{path}`: {source}")]
    File {
        /// Sanitized path of the file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// No route matches the request.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Background task failed.
    #[error("Request failed: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::BadPath { .. } => StatusCode::BAD_REQUEST,
            Self::File { source, .. } if is_missing(source) => StatusCode::NOT_FOUND,
            Self::Gallery {
                source: IndexError::ReadDir { source, .. },
                ..
            } if is_missing(source) => StatusCode::NOT_FOUND,
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::Index(_) | Self::Gallery { .. } | Self::File { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Render as a full page using `template`.
    pub(crate) fn into_page(self, template: &PageTemplate) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = format!(
            "<p><a href=\"/\">Main page</a></p>\n<p class=\"error\">Error: {}</p>\n",
            escape_html(&self.to_string())
        );
        (status, Html(template.wrap(&body))).into_response()
    }
}

/// Whether an I/O error means the requested entry does not exist as asked.
///
/// A gallery that is a file or a document that is a directory counts as
/// missing.
fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::IsADirectory
    )
}
