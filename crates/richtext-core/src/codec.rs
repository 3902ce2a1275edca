//! Markup codec interface.
//!
//! The engine does not parse or render markup itself. A codec turns markup into a
//! [`FormattedText`] value (spans attached as-is) and back; external crates (`richtext-html`)
//! implement [`FormatCodec`] and are plugged in via
//! [`SpanEngine::load_with`](crate::SpanEngine::load_with) /
//! [`SpanEngine::export_with`](crate::SpanEngine::export_with).

use crate::error::FormatError;
use crate::text::FormattedText;

/// Converts between markup text and [`FormattedText`].
pub trait FormatCodec {
    /// The error type returned by [`FormatCodec::decode`].
    type Error: From<FormatError>;

    /// Parse markup. Spans may overlap or straddle lines; the engine re-applies them.
    fn decode(&self, markup: &str) -> Result<FormattedText, Self::Error>;

    /// Render markup. Decoding the output and loading it must reproduce the same span set.
    fn encode(&self, text: &FormattedText) -> String;
}
