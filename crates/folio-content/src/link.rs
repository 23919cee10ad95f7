//! Link target encoding.
//!
//! Relative paths from the index are embedded in `href` attributes and come
//! back as request paths. Encoding keeps `/` literal so links stay readable;
//! decoding also accepts `+` for spaces and `%2F` for slashes.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::PathError;

/// Unreserved characters plus the path separator.
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode a slash-separated relative path for use in a link.
pub fn encode_link_path(path: &str) -> String {
    utf8_percent_encode(path, LINK_ENCODE_SET).to_string()
}

/// Decode a request path produced by [`encode_link_path`] or by a form-style encoder.
///
/// Fails with [`PathError::Decode`] when a `%` is not followed by two hex
/// digits or when the decoded bytes are not UTF-8.
pub fn decode_link_path(raw: &str) -> Result<String, PathError> {
    if !has_valid_escapes(raw) {
        return Err(PathError::Decode(raw.to_owned()));
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| PathError::Decode(raw.to_owned()))
}

fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
