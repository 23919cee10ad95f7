//! Markdown rendering and page template for Folio.
//!
//! Two pieces, both pure:
//! - [`MarkdownRenderer`] turns markdown into an HTML fragment (pulldown-cmark)
//! - [`PageTemplate`] wraps a fragment into a full HTML page
//!
//! # Example
//!
//! ```
//! use folio_renderer::{PageTemplate, render_markdown};
//!
//! let body = render_markdown("# Hello\n\n**Bold** text");
//! let page = PageTemplate::default().wrap(&body);
//! assert!(page.contains("<h1>Hello</h1>"));
//! ```

mod markdown;
mod template;

pub use markdown::{MarkdownRenderer, escape_markdown, render_markdown};
pub use template::{CONTENT_PLACEHOLDER, PageTemplate, TemplateError, escape_html};
