//! `richtext-html` - HTML-like markup codec for `richtext-core`.
//!
//! Decodes the small tag vocabulary rich-text widgets exchange (`<b>`, `<i>`, `<u>`, `<s>`,
//! `<a href>`, `<ul>/<li>`, `<blockquote>`, `<p>`, `<br>`) into a
//! [`FormattedText`](richtext_core::FormattedText) and encodes it back. The output is not
//! byte-identical to the input, but decoding the encoded form and loading it into a
//! [`SpanEngine`] yields the same spans.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::FormatKind;
//!
//! let engine = richtext_html::from_html("<b>Hello</b> <a href=\"https://example.com\">World</a>")
//!     .unwrap();
//! assert_eq!(engine.text(), "Hello World");
//! assert!(engine.has(FormatKind::Bold, 0, 5).unwrap());
//!
//! let html = richtext_html::to_html(&engine);
//! assert_eq!(html, "<b>Hello</b> <a href=\"https://example.com\">World</a>");
//! ```

mod decode;
mod encode;

use regex::Regex;
use richtext_core::{FormatCodec, FormatError, FormattedText, SpanEngine};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while decoding markup.
pub enum HtmlError {
    #[error("decoded span could not be placed: {0}")]
    /// A decoded span or text insertion was rejected by the core.
    Format(#[from] FormatError),
}

/// The HTML-like markup codec.
#[derive(Debug, Clone)]
pub struct HtmlCodec {
    tag: Regex,
    entity: Regex,
    href: Regex,
}

impl HtmlCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self {
            // Comment, or opening/closing tag with its raw attribute text.
            tag: Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>")
                .expect("valid tag regex"),
            entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);")
                .expect("valid entity regex"),
            href: Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
                .expect("valid href regex"),
        }
    }
}

impl Default for HtmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatCodec for HtmlCodec {
    type Error = HtmlError;

    fn decode(&self, markup: &str) -> Result<FormattedText, HtmlError> {
        decode::Decoder::new(&self.entity, &self.href).run(&self.tag, markup)
    }

    fn encode(&self, text: &FormattedText) -> String {
        encode::encode(text)
    }
}

/// Decode `markup` into a new engine.
pub fn from_html(markup: &str) -> Result<SpanEngine, HtmlError> {
    let mut engine = SpanEngine::empty();
    engine.load_with(&HtmlCodec::new(), markup)?;
    Ok(engine)
}

/// Encode the engine's buffer as markup.
pub fn to_html(engine: &SpanEngine) -> String {
    engine.export_with(&HtmlCodec::new())
}
