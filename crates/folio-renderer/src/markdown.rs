//! Markdown to HTML fragment rendering.

use pulldown_cmark::{Options, Parser, html};

/// Markdown renderer producing an HTML fragment.
///
/// GitHub Flavored Markdown extensions are enabled by default.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    /// - Footnotes
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to an HTML fragment.
    ///
    /// Carriage returns are dropped first so CRLF documents render the same
    /// as LF ones.
    pub fn render(&self, markdown: &str) -> String {
        let markdown = markdown.replace('\r', "");
        let parser = Parser::new_ext(&markdown, self.parser_options());

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Escape text so markdown renders it literally.
///
/// Every ASCII punctuation character gets a backslash, which `CommonMark`
/// treats as a literal. Used for titles and names placed into generated
/// markdown.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if c.is_ascii_punctuation() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render markdown with the default renderer.
pub fn render_markdown(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}
