//! Document title extraction from the opening bytes of a file.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Upper bound on bytes read when looking for a title.
pub const TITLE_PROBE_BYTES: u64 = 200;

/// Returned when both the document and the fallback are blank.
const UNTITLED: &str = "Untitled";

/// Derive a display title for the document at `path`.
///
/// Uses the first line of the file with leading `#` heading markers removed.
/// Returns `fallback` when the file cannot be read, has no newline within the
/// first [`TITLE_PROBE_BYTES`] bytes, or its first line is blank. Never fails
/// and never returns an empty string.
pub fn extract_title(path: &Path, fallback: &str) -> String {
    let fallback = if fallback.trim().is_empty() {
        UNTITLED
    } else {
        fallback
    };

    match read_probe(path) {
        Ok(probe) => title_from_probe(&probe).unwrap_or_else(|| fallback.to_owned()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Title probe failed");
            fallback.to_owned()
        }
    }
}

fn read_probe(path: &Path) -> io::Result<Vec<u8>> {
    let mut probe = Vec::new();
    File::open(path)?
        .take(TITLE_PROBE_BYTES)
        .read_to_end(&mut probe)?;
    Ok(probe)
}

fn title_from_probe(probe: &[u8]) -> Option<String> {
    let newline = probe.iter().position(|&b| b == b'\n')?;
    let line = String::from_utf8_lossy(&probe[..newline]);
    let title = line.trim().trim_start_matches('#').trim();
    (!title.is_empty()).then(|| title.to_owned())
}
