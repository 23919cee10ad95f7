//! HTML page wrapper.
//!
//! Rendered fragments are placed into a full page by [`PageTemplate::wrap`].
//! The template is chosen once at startup and never changes afterwards.

use std::path::{Path, PathBuf};

/// Placeholder replaced with the page body.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Built-in responsive article layout.
const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
	<head>
		<meta charset="utf-8">
		<meta name="viewport" content="width=device-width, initial-scale=1">
		<style>
			.markdown-body {
				box-sizing: border-box;
				min-width: 200px;
				max-width: 900px;
				margin: 0 auto;
				padding: 45px;
			}
			@media (max-width: 767px) {
				.markdown-body {
					padding: 15px;
				}
			}
			img {
				max-height: 500px;
				max-width: 500px;
				height: auto;
				width: auto;
			}
		</style>
	</head>
	<body>
		<article class="markdown-body">
			{content}
		</article>
	</body>
</html>
"#;

/// Template loading error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("Cannot read template `{}`: {source}", .path.display())]
    Io {
        /// Template file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Template has no `{content}` placeholder.
    #[error("Template `{}` has no {{content}} placeholder", .0.display())]
    MissingPlaceholder(PathBuf),
}

/// Full-page HTML wrapper around rendered fragments.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    /// Text before the placeholder.
    head: String,
    /// Text after the placeholder.
    tail: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::split(DEFAULT_TEMPLATE).unwrap_or_else(|| Self {
            head: DEFAULT_TEMPLATE.to_owned(),
            tail: String::new(),
        })
    }
}

impl PageTemplate {
    /// Load a template from a file containing the `{content}` placeholder.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::split(&source).ok_or_else(|| TemplateError::MissingPlaceholder(path.to_path_buf()))
    }

    /// Wrap a body fragment into a full page.
    pub fn wrap(&self, body_html: &str) -> String {
        let mut page = String::with_capacity(self.head.len() + body_html.len() + self.tail.len());
        page.push_str(&self.head);
        page.push_str(body_html);
        page.push_str(&self.tail);
        page
    }

    fn split(source: &str) -> Option<Self> {
        source
            .split_once(CONTENT_PLACEHOLDER)
            .map(|(head, tail)| Self {
                head: head.to_owned(),
                tail: tail.to_owned(),
            })
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
