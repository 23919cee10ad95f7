//! Security headers for every Folio response.
//!
//! Pages are plain HTML rendered from local markdown. They carry no scripts,
//! load nothing from other origins and are never meant to be framed, so the
//! headers lock all of that down. Raw files are sent with `nosniff` so a text
//! file cannot be reinterpreted as HTML.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use axum::response::Response;

/// Content-Security-Policy for rendered pages and raw files alike.
const CSP: &str = "default-src 'self'; \
                   script-src 'none'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data:; \
                   frame-ancestors 'none'";

/// Headers set on every response, replacing any set by a handler.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", CSP),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
];

/// Response mapper installed with `axum::middleware::map_response`.
pub(crate) async fn add_security_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}
