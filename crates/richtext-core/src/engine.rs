//! The public facade: one engine bound to one formatted buffer.
//!
//! `SpanEngine` dispatches `set`/`remove`/`has`/`toggle` to the inline or paragraph algebra by
//! kind, owns the selection the host reports, runs paragraph normalization after every text edit
//! and emits one [`FormatChange`] per completed mutation.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{FormatKind, SpanEngine};
//!
//! let mut engine = SpanEngine::new("Hello World");
//! engine.set(FormatKind::Bold, 0, 5).unwrap();
//! assert!(engine.has(FormatKind::Bold, 0, 5).unwrap());
//! assert!(!engine.has(FormatKind::Bold, 0, 11).unwrap());
//!
//! engine.toggle(FormatKind::Bold, 0, 5).unwrap();
//! assert_eq!(engine.spans_of(FormatKind::Bold).count(), 0);
//! ```

use crate::codec::FormatCodec;
use crate::config::FormatStyle;
use crate::error::FormatError;
use crate::kind::FormatKind;
use crate::spans::Span;
use crate::state::{
    DocumentState, FormatChange, FormatChangeCallback, FormatChangeType, SelectionState,
};
use crate::text::FormattedText;
use std::ops::Range;

/// A link and the exact range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Link target.
    pub url: String,
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

/// Span engine bound to one formatted buffer.
pub struct SpanEngine {
    text: FormattedText,
    selection: Range<usize>,
    style: FormatStyle,
    version: u64,
    callbacks: Vec<FormatChangeCallback>,
}

impl SpanEngine {
    /// Create an engine over unformatted `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: FormattedText::new(text),
            selection: 0..0,
            style: FormatStyle::default(),
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Create an engine over an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create an engine from a decoded value, re-applying its spans.
    pub fn from_formatted(text: FormattedText) -> Result<Self, FormatError> {
        let mut engine = Self::empty();
        engine.load(text)?;
        Ok(engine)
    }

    /// Replace the presentation style.
    pub fn with_style(mut self, style: FormatStyle) -> Self {
        self.style = style;
        self
    }

    /// Presentation style.
    pub fn style(&self) -> &FormatStyle {
        &self.style
    }

    /// Replace the presentation style.
    pub fn set_style(&mut self, style: FormatStyle) {
        self.style = style;
    }

    /// The formatted buffer.
    pub fn formatted_text(&self) -> &FormattedText {
        &self.text
    }

    /// The buffer contents.
    pub fn text(&self) -> String {
        self.text.text()
    }

    /// Buffer length in characters.
    pub fn char_count(&self) -> usize {
        self.text.len_chars()
    }

    /// All spans, in order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.text.spans().iter()
    }

    /// Spans of one kind, in order.
    pub fn spans_of(&self, kind: FormatKind) -> impl Iterator<Item = &Span> {
        self.text.spans_of(kind)
    }

    // Selection ===================================================================================

    /// Current selection.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Move the selection. Fails instead of clamping.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<(), FormatError> {
        self.text.check_range(start, end)?;
        if self.selection == (start..end) {
            return Ok(());
        }
        self.selection = start..end;
        self.mark_changed(FormatChangeType::SelectionChanged, start..end);
        Ok(())
    }

    /// `set` over the current selection.
    pub fn set_selected(&mut self, kind: FormatKind) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        self.set(kind, start, end)
    }

    /// `remove` over the current selection.
    pub fn remove_selected(&mut self, kind: FormatKind) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        self.remove(kind, start, end)
    }

    /// `has` over the current selection.
    pub fn has_selected(&self, kind: FormatKind) -> Result<bool, FormatError> {
        self.has(kind, self.selection.start, self.selection.end)
    }

    /// `toggle` over the current selection.
    pub fn toggle_selected(&mut self, kind: FormatKind) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        self.toggle(kind, start, end)
    }

    /// Remove every kind over the current selection.
    pub fn clear_format(&mut self) -> Result<(), FormatError> {
        let Range { start, end } = self.selection();
        self.clear_format_in(start, end)
    }

    // Formatting ==================================================================================

    /// Apply `kind` over `[start, end)`.
    ///
    /// Links need a URL and are created through [`set_link`](Self::set_link); a non-empty
    /// `set(FormatKind::Link, ..)` fails with [`FormatError::InvalidFormatRequest`].
    pub fn set(&mut self, kind: FormatKind, start: usize, end: usize) -> Result<(), FormatError> {
        self.mutate_spans(start..end, |text| {
            if kind.is_paragraph() {
                text.set_paragraph(kind, start, end)
            } else {
                text.set_inline(kind, start, end, None)
            }
        })
    }

    /// Remove `kind` from `[start, end)`.
    pub fn remove(&mut self, kind: FormatKind, start: usize, end: usize) -> Result<(), FormatError> {
        self.mutate_spans(start..end, |text| {
            if kind.is_paragraph() {
                text.remove_paragraph(kind, start, end)
            } else {
                text.remove_inline(kind, start, end)
            }
        })
    }

    /// Check whether `[start, end)` is fully formatted with `kind`. Never notifies.
    pub fn has(&self, kind: FormatKind, start: usize, end: usize) -> Result<bool, FormatError> {
        if kind.is_paragraph() {
            self.text.is_full_of_paragraphs(kind, start, end)
        } else {
            self.text.is_fully_spanned(kind, start, end)
        }
    }

    /// Remove `kind` if `has` holds, apply it otherwise.
    pub fn toggle(&mut self, kind: FormatKind, start: usize, end: usize) -> Result<(), FormatError> {
        self.mutate_spans(start..end, |text| {
            if kind.is_paragraph() {
                text.toggle_paragraph(kind, start, end)
            } else {
                text.toggle_inline(kind, start, end, None)
            }
        })
    }

    /// Remove every kind from `[start, end)`, with a single notification.
    pub fn clear_format_in(&mut self, start: usize, end: usize) -> Result<(), FormatError> {
        self.text.check_range(start, end)?;
        self.mutate_spans(start..end, |text| {
            let mut changed = false;
            for kind in FormatKind::ALL {
                changed |= if kind.is_paragraph() {
                    text.remove_paragraph(kind, start, end)?
                } else {
                    text.remove_inline(kind, start, end)?
                };
            }
            Ok(changed)
        })
    }

    /// Link `[start, end)` to `url`, replacing any link overlapping the range.
    pub fn set_link(&mut self, url: &str, start: usize, end: usize) -> Result<(), FormatError> {
        self.text.check_range(start, end)?;
        if url.is_empty() {
            tracing::debug!(start, end, "rejected link without URL");
            return Err(FormatError::InvalidFormatRequest("link URL must not be empty"));
        }
        if start == end {
            tracing::debug!(start, "rejected link over an empty range");
            return Err(FormatError::InvalidFormatRequest(
                "a link needs a non-empty range",
            ));
        }
        self.mutate_spans(start..end, |text| {
            text.set_inline(FormatKind::Link, start, end, Some(url))
        })
    }

    /// The link covering `offset`, if any.
    ///
    /// With the caret right after a link and no link covering it, that link is reported so it
    /// can still be edited in place. Zero-width links are never reported.
    pub fn link_at(&self, offset: usize) -> Result<Option<LinkSpan>, FormatError> {
        self.text.check_range(offset, offset)?;
        let candidates: Vec<Span> = self
            .text
            .spans()
            .query(FormatKind::Link, offset, offset)
            .into_iter()
            .filter(|span| !span.is_empty())
            .collect();
        let found = candidates
            .iter()
            .find(|span| span.contains(offset))
            .or_else(|| candidates.iter().find(|span| span.end == offset));

        Ok(found.map(|span| LinkSpan {
            url: span.url.clone().unwrap_or_default(),
            start: span.start,
            end: span.end,
        }))
    }

    /// Re-align paragraph spans to whole lines. Returns `true` if anything changed.
    pub fn normalize_paragraphs(&mut self) -> bool {
        let mut changed = false;
        for kind in FormatKind::PARAGRAPH {
            changed |= self.text.normalize_paragraphs(kind);
        }
        if changed {
            let len = self.char_count();
            self.mark_changed(FormatChangeType::SpansChanged, 0..len);
        }
        changed
    }

    // Text edits ==================================================================================

    /// Insert `text` at `offset`.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> Result<(), FormatError> {
        self.replace_text(offset, offset, text)
    }

    /// Delete `[start, end)`.
    pub fn delete_text(&mut self, start: usize, end: usize) -> Result<(), FormatError> {
        self.replace_text(start, end, "")
    }

    /// Replace `[start, end)` with `text`, then normalize paragraphs and notify once.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) -> Result<(), FormatError> {
        self.text.check_range(start, end)?;
        if start == end && text.is_empty() {
            return Ok(());
        }

        self.text.delete(start, end)?;
        self.text.insert(start, text)?;
        let inserted = text.chars().count();
        self.selection = shift_for_edit(self.selection.start, start, end, inserted)
            ..shift_for_edit(self.selection.end, start, end, inserted);

        for kind in FormatKind::PARAGRAPH {
            self.text.normalize_paragraphs(kind);
        }

        self.mark_changed(FormatChangeType::TextChanged, start..start + inserted);
        Ok(())
    }

    // Codec =======================================================================================

    /// Replace the whole buffer with a decoded value.
    ///
    /// Decoded spans are re-applied through the regular operations: inline spans merge, links
    /// keep their URL and paragraph spans are split per line.
    pub fn load(&mut self, decoded: FormattedText) -> Result<(), FormatError> {
        let mut text = FormattedText::new("");
        text.insert(0, &decoded.text())?;

        for span in decoded.spans().iter() {
            match span.kind {
                FormatKind::Bullet | FormatKind::Quote => {
                    text.set_paragraph(span.kind, span.start, span.end)?;
                }
                FormatKind::Link => {
                    if !span.is_empty() {
                        text.set_inline(span.kind, span.start, span.end, span.url.as_deref())?;
                    }
                }
                FormatKind::Bold
                | FormatKind::Italic
                | FormatKind::Underline
                | FormatKind::Strike => {
                    if !span.is_empty() {
                        text.set_inline(span.kind, span.start, span.end, None)?;
                    }
                }
            }
        }
        for kind in FormatKind::PARAGRAPH {
            text.normalize_paragraphs(kind);
        }

        tracing::debug!(
            chars = text.len_chars(),
            spans = text.spans().len(),
            "loaded formatted text"
        );
        self.text = text;
        self.selection = 0..0;
        let len = self.char_count();
        self.mark_changed(FormatChangeType::TextChanged, 0..len);
        Ok(())
    }

    /// Decode `markup` with `codec` and load it.
    pub fn load_with<C: FormatCodec>(&mut self, codec: &C, markup: &str) -> Result<(), C::Error> {
        let decoded = codec.decode(markup)?;
        self.load(decoded)?;
        Ok(())
    }

    /// Encode the buffer with `codec`.
    pub fn export_with<C: FormatCodec>(&self, codec: &C) -> String {
        codec.encode(&self.text)
    }

    // State =======================================================================================

    /// Current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if state has changed since a version.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Document summary.
    pub fn get_document_state(&self) -> DocumentState {
        DocumentState {
            char_count: self.char_count(),
            span_count: self.text.spans().len(),
            version: self.version,
        }
    }

    /// Active formats over the selection, for toolbar indicators.
    pub fn get_selection_state(&self) -> SelectionState {
        let Range { start, end } = self.selection();
        let active = FormatKind::ALL
            .into_iter()
            .filter(|&kind| self.has(kind, start, end).unwrap_or(false))
            .collect();
        SelectionState {
            start,
            end,
            active,
            link: self.link_at(start).ok().flatten(),
        }
    }

    /// Subscribe to change notifications.
    ///
    /// Callbacks run after the mutation is complete and cannot reach back into the engine.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&FormatChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn mutate_spans<F>(&mut self, region: Range<usize>, op: F) -> Result<(), FormatError>
    where
        F: FnOnce(&mut FormattedText) -> Result<bool, FormatError>,
    {
        self.text.check_range(region.start, region.end)?;
        if op(&mut self.text)? {
            self.mark_changed(FormatChangeType::SpansChanged, region);
        }
        Ok(())
    }

    fn mark_changed(&mut self, change_type: FormatChangeType, region: Range<usize>) {
        let old_version = self.version;
        self.version += 1;
        let change = FormatChange::new(change_type, old_version, self.version).with_region(region);
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

impl Default for SpanEngine {
    fn default() -> Self {
        Self::empty()
    }
}

fn shift_for_edit(pos: usize, start: usize, end: usize, inserted: usize) -> usize {
    if pos < start {
        pos
    } else if pos <= end {
        start + inserted
    } else {
        pos - (end - start) + inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn ranges(engine: &SpanEngine, kind: FormatKind) -> Vec<(usize, usize)> {
        engine.spans_of(kind).map(|s| (s.start, s.end)).collect()
    }

    fn recorder(engine: &mut SpanEngine) -> Arc<Mutex<Vec<FormatChangeType>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(move |change| sink.lock().unwrap().push(change.change_type));
        seen
    }

    #[test]
    fn test_hello_world_scenario() {
        let mut engine = SpanEngine::new("Hello World");
        engine.set(FormatKind::Bold, 0, 5).unwrap();
        assert!(engine.has(FormatKind::Bold, 0, 5).unwrap());
        assert!(!engine.has(FormatKind::Bold, 0, 11).unwrap());

        engine.toggle(FormatKind::Bold, 0, 5).unwrap();
        assert_eq!(engine.spans_of(FormatKind::Bold).count(), 0);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut engine = SpanEngine::new("abc");
        assert_eq!(
            engine.set(FormatKind::Bold, 0, 4),
            Err(FormatError::OutOfRange { start: 0, end: 4, len: 3 })
        );
        assert!(engine.set(FormatKind::Bullet, 2, 1).is_err());
        assert!(engine.has(FormatKind::Italic, 0, 9).is_err());
        assert!(engine.set_selection(1, 5).is_err());
        assert!(engine.link_at(4).is_err());
        assert!(engine.spans().next().is_none());
    }

    #[test]
    fn test_notifications_only_on_change() {
        let mut engine = SpanEngine::new("Hello World");
        let seen = recorder(&mut engine);

        engine.set(FormatKind::Italic, 0, 5).unwrap();
        engine.set(FormatKind::Italic, 0, 5).unwrap();
        engine.has(FormatKind::Italic, 0, 5).unwrap();
        engine.remove(FormatKind::Underline, 0, 5).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![FormatChangeType::SpansChanged]);
        assert_eq!(engine.version(), 1);
    }

    #[test]
    fn test_clear_format_notifies_once() {
        let mut engine = SpanEngine::new("one\ntwo");
        engine.set(FormatKind::Bold, 0, 3).unwrap();
        engine.set(FormatKind::Quote, 0, 7).unwrap();
        engine.set_link("http://a", 4, 7).unwrap();
        engine.set_selection(0, 7).unwrap();

        let seen = recorder(&mut engine);
        engine.clear_format().unwrap();

        assert_eq!(engine.spans().count(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![FormatChangeType::SpansChanged]);
    }

    #[test]
    fn test_link_requests() {
        let mut engine = SpanEngine::new("click here");
        assert!(matches!(
            engine.set_link("", 0, 5),
            Err(FormatError::InvalidFormatRequest(_))
        ));
        assert!(matches!(
            engine.set_link("http://a", 3, 3),
            Err(FormatError::InvalidFormatRequest(_))
        ));
        assert!(matches!(
            engine.set(FormatKind::Link, 0, 5),
            Err(FormatError::InvalidFormatRequest(_))
        ));

        engine.set_link("http://a", 6, 10).unwrap();
        engine.set_link("http://b", 0, 8).unwrap();
        let link = engine.link_at(2).unwrap().unwrap();
        assert_eq!(
            link,
            LinkSpan {
                url: "http://b".to_string(),
                start: 0,
                end: 8
            }
        );
        assert_eq!(engine.spans_of(FormatKind::Link).count(), 1);
        assert_eq!(engine.link_at(8).unwrap().map(|l| l.end), Some(8));
        assert_eq!(engine.link_at(9).unwrap(), None);
    }

    #[test]
    fn test_edits_normalize_paragraphs() {
        let mut engine = SpanEngine::new("abcdef");
        engine.set(FormatKind::Bullet, 0, 0).unwrap();
        let seen = recorder(&mut engine);

        engine.insert_text(3, "\n").unwrap();
        assert_eq!(ranges(&engine, FormatKind::Bullet), vec![(0, 3), (4, 7)]);
        assert!(!engine.normalize_paragraphs());
        assert_eq!(*seen.lock().unwrap(), vec![FormatChangeType::TextChanged]);
    }

    #[test]
    fn test_redundant_mutations_do_not_notify() {
        let mut engine = SpanEngine::new("Hello\nWorld");
        engine.set(FormatKind::Bold, 0, 11).unwrap();
        engine.set(FormatKind::Quote, 0, 11).unwrap();
        let seen = recorder(&mut engine);

        engine.set(FormatKind::Bold, 2, 8).unwrap();
        engine.set(FormatKind::Quote, 7, 7).unwrap();
        engine.remove(FormatKind::Bullet, 0, 11).unwrap();
        assert!(!engine.normalize_paragraphs());
        assert!(seen.lock().unwrap().is_empty());

        engine.clear_format_in(0, 5).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![FormatChangeType::SpansChanged]);
        assert_eq!(ranges(&engine, FormatKind::Bold), vec![(5, 11)]);
    }

    #[test]
    fn test_link_at_prefers_covering_link() {
        let mut engine = SpanEngine::new("0123456789ab");
        engine.set_link("http://a", 0, 5).unwrap();
        engine.set_link("http://b", 5, 10).unwrap();

        let url_at = |offset| engine.link_at(offset).unwrap().map(|link| link.url);
        assert_eq!(url_at(4).as_deref(), Some("http://a"));
        assert_eq!(url_at(5).as_deref(), Some("http://b"));
        assert_eq!(url_at(11), None);

        // Caret right after a link, nothing covering it.
        assert_eq!(
            engine.link_at(10).unwrap(),
            Some(LinkSpan {
                url: "http://b".to_string(),
                start: 5,
                end: 10,
            })
        );
    }

    #[test]
    fn test_deleted_link_is_not_reported() {
        let mut engine = SpanEngine::new("ab link cd");
        engine.set_link("http://a", 3, 7).unwrap();
        engine.delete_text(3, 7).unwrap();
        engine.set_selection(3, 3).unwrap();

        assert_eq!(engine.link_at(3).unwrap(), None);
        assert_eq!(engine.get_selection_state().link, None);

        engine.insert_text(3, "zz").unwrap();
        assert_eq!(engine.spans_of(FormatKind::Link).count(), 0);
    }

    #[test]
    fn test_selection_follows_edits() {
        let mut engine = SpanEngine::new("Hello World");
        engine.set_selection(6, 11).unwrap();
        engine.insert_text(0, ">> ").unwrap();
        assert_eq!(engine.selection(), 9..14);

        engine.delete_text(0, 3).unwrap();
        assert_eq!(engine.selection(), 6..11);

        engine.replace_text(6, 11, "Rust").unwrap();
        assert_eq!(engine.text(), "Hello Rust");
        assert_eq!(engine.selection(), 10..10);
    }

    #[test]
    fn test_selection_state() {
        let mut engine = SpanEngine::new("Hello\nWorld");
        engine.set(FormatKind::Bold, 0, 5).unwrap();
        engine.set(FormatKind::Quote, 0, 5).unwrap();
        engine.set_link("http://a", 0, 5).unwrap();
        engine.set_selection(1, 4).unwrap();

        let state = engine.get_selection_state();
        assert!(state.is_active(FormatKind::Bold));
        assert!(state.is_active(FormatKind::Quote));
        assert!(state.is_active(FormatKind::Link));
        assert!(!state.is_active(FormatKind::Italic));
        assert_eq!(state.link.map(|l| l.url), Some("http://a".to_string()));
    }

    #[test]
    fn test_load_reapplies_spans() {
        let mut decoded = FormattedText::new("ab\ncd");
        decoded.push_span(Span::inline(FormatKind::Bold, 0, 2)).unwrap();
        decoded.push_span(Span::inline(FormatKind::Bold, 2, 4)).unwrap();
        decoded.push_span(Span::paragraph(FormatKind::Quote, 0, 5)).unwrap();
        decoded.push_span(Span::link("http://a", 3, 5)).unwrap();

        let engine = SpanEngine::from_formatted(decoded).unwrap();
        assert_eq!(ranges(&engine, FormatKind::Bold), vec![(0, 4)]);
        assert_eq!(ranges(&engine, FormatKind::Quote), vec![(0, 2), (3, 5)]);
        assert_eq!(ranges(&engine, FormatKind::Link), vec![(3, 5)]);
    }
}
