//! The formatted text value: a character buffer plus the spans anchored to it.

use crate::error::{FormatError, check_range};
use crate::kind::FormatKind;
use crate::lines;
use crate::spans::{Span, SpanSet};
use ropey::Rope;

/// A character buffer together with its formatting spans.
///
/// Raw mutations ([`insert`](Self::insert), [`delete`](Self::delete)) keep span offsets anchored
/// to the text but do not re-align paragraph spans; [`SpanEngine`](crate::SpanEngine) runs
/// normalization after every edit.
#[derive(Debug, Clone, Default)]
pub struct FormattedText {
    rope: Rope,
    spans: SpanSet,
}

impl FormattedText {
    /// Create unformatted text. CRLF line endings are normalized to LF.
    pub fn new(text: &str) -> Self {
        let rope = if text.contains("\r\n") {
            Rope::from_str(&text.replace("\r\n", "\n"))
        } else {
            Rope::from_str(text)
        };
        Self {
            rope,
            spans: SpanSet::new(),
        }
    }

    /// The underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The buffer contents as a `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The characters in `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Result<String, FormatError> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    /// Buffer length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// All spans.
    pub fn spans(&self) -> &SpanSet {
        &self.spans
    }

    pub(crate) fn spans_mut(&mut self) -> &mut SpanSet {
        &mut self.spans
    }

    /// Spans of `kind`, in order.
    pub fn spans_of(&self, kind: FormatKind) -> impl Iterator<Item = &Span> {
        self.spans.of_kind(kind)
    }

    /// See [`lines::line_start`].
    pub fn line_start(&self, pos: usize) -> Result<usize, FormatError> {
        lines::line_start(&self.rope, pos)
    }

    /// See [`lines::line_end`].
    pub fn line_end(&self, pos: usize) -> Result<usize, FormatError> {
        lines::line_end(&self.rope, pos)
    }

    /// Validate `[start, end)` against the buffer.
    pub fn check_range(&self, start: usize, end: usize) -> Result<(), FormatError> {
        check_range(start, end, self.len_chars())
    }

    /// Attach a span as-is, without merging or snapping.
    ///
    /// Used by codecs to hand over decoded spans; [`SpanEngine::load`](crate::SpanEngine::load)
    /// re-applies them through the regular operations.
    pub fn push_span(&mut self, span: Span) -> Result<(), FormatError> {
        self.check_range(span.start, span.end)?;
        if span.kind == FormatKind::Link && span.url.as_deref().is_none_or(str::is_empty) {
            return Err(FormatError::InvalidFormatRequest("link span requires a URL"));
        }
        self.spans.insert(span);
        Ok(())
    }

    /// Insert `text` at `offset`, shifting spans.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), FormatError> {
        self.check_range(offset, offset)?;
        if text.is_empty() {
            return Ok(());
        }

        self.rope.insert(offset, text);
        self.spans.update_for_insertion(offset, text.chars().count());
        Ok(())
    }

    /// Delete `[start, end)`, clamping spans.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), FormatError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }

        self.rope.remove(start..end);
        self.spans.update_for_deletion(start, end);
        Ok(())
    }
}
