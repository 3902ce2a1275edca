//! Span records and the ordered span collection.
//!
//! Spans own their `[start, end)` bounds directly and live in one vector kept sorted by
//! `(start, end, kind)`. A prefix-maximum of end offsets lets range queries stop scanning
//! backwards as soon as no earlier span can reach the query.

use crate::kind::FormatKind;

/// How a span reacts to text inserted exactly at its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Text inserted at either edge stays outside the span.
    Exclusive,
    /// Text inserted at the end offset joins the span ("format sticks after the cursor").
    InclusiveEnd,
}

/// A formatting kind applied to a half-open character range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// Formatting kind.
    pub kind: FormatKind,
    /// Start offset in characters (inclusive).
    pub start: usize,
    /// End offset in characters (exclusive).
    pub end: usize,
    /// Edge behaviour on insertion.
    pub boundary: Boundary,
    /// Link target; present only for [`FormatKind::Link`].
    pub url: Option<String>,
}

impl Span {
    /// Create an inline span without payload. New inline spans extend at their end.
    pub fn inline(kind: FormatKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            boundary: Boundary::InclusiveEnd,
            url: None,
        }
    }

    /// Create a link span carrying `url`.
    pub fn link(url: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: FormatKind::Link,
            start,
            end,
            boundary: Boundary::InclusiveEnd,
            url: Some(url.into()),
        }
    }

    /// Create a paragraph span. Paragraph spans never extend on their own.
    pub fn paragraph(kind: FormatKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            boundary: Boundary::Exclusive,
            url: None,
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-width span (a caret position).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if the span covers the character at `pos`.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check whether this span is reported by a query over `[start, end]`.
    ///
    /// Spans that only touch a non-empty query are excluded, unless the span itself is empty;
    /// a zero-width query reports everything containing or touching the point.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        if self.start > end || self.end < start {
            return false;
        }
        if self.start != self.end && start != end && (self.start == end || self.end == start) {
            return false;
        }
        true
    }

    fn sort_key(&self) -> (usize, usize, FormatKind) {
        (self.start, self.end, self.kind)
    }
}

/// The ordered span collection of one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSet {
    /// Spans sorted by `(start, end, kind)`.
    spans: Vec<Span>,
    /// `prefix_max_end[i] = max(spans[0..=i].end)`
    prefix_max_end: Vec<usize>,
}

impl SpanSet {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_prefix_max_end_from(&mut self, start_idx: usize) {
        self.prefix_max_end.resize(self.spans.len(), 0);

        let mut max_end = if start_idx == 0 {
            0
        } else {
            self.prefix_max_end[start_idx - 1]
        };

        for (idx, span) in self.spans.iter().enumerate().skip(start_idx) {
            max_end = max_end.max(span.end);
            self.prefix_max_end[idx] = max_end;
        }
    }

    fn resort(&mut self) {
        self.spans.sort_by_key(Span::sort_key);
        self.rebuild_prefix_max_end_from(0);
    }

    /// Insert a span, keeping sort order.
    pub fn insert(&mut self, span: Span) {
        let key = span.sort_key();
        let pos = self
            .spans
            .partition_point(|existing| existing.sort_key() <= key);

        tracing::trace!(kind = %span.kind, start = span.start, end = span.end, "insert span");
        self.spans.insert(pos, span);
        self.prefix_max_end.insert(pos, 0);
        self.rebuild_prefix_max_end_from(pos);
    }

    /// Remove the span equal to `span`. Returns `false` if none matched.
    pub fn remove(&mut self, span: &Span) -> bool {
        let key = span.sort_key();
        let first = self.spans.partition_point(|s| s.sort_key() < key);
        let Some(offset) = self.spans[first..]
            .iter()
            .take_while(|s| s.sort_key() == key)
            .position(|s| s == span)
        else {
            return false;
        };

        let pos = first + offset;
        tracing::trace!(kind = %span.kind, start = span.start, end = span.end, "remove span");
        self.spans.remove(pos);
        self.prefix_max_end.remove(pos);
        if pos < self.spans.len() {
            self.rebuild_prefix_max_end_from(pos);
        }
        true
    }

    /// Change the boundary of the span equal to `span`. Returns `false` if none matched.
    pub fn set_boundary(&mut self, span: &Span, boundary: Boundary) -> bool {
        match self.spans.iter_mut().find(|s| *s == span) {
            Some(existing) => {
                existing.boundary = boundary;
                true
            }
            None => false,
        }
    }

    /// All spans of `kind` reported by a query over `[start, end]` (see [`Span::intersects`]).
    pub fn query(&self, kind: FormatKind, start: usize, end: usize) -> Vec<Span> {
        self.query_refs(kind, start, end).cloned().collect()
    }

    /// Returns `true` if any span of `kind` is reported over `[start, end]`.
    pub fn contains_kind(&self, kind: FormatKind, start: usize, end: usize) -> bool {
        self.query_refs(kind, start, end).next().is_some()
    }

    fn query_refs(
        &self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &Span> + '_ {
        // Everything starting after `end` is out; scan back from there while an earlier span can
        // still reach `start`.
        let search_end = self.spans.partition_point(|s| s.start <= end);
        let mut scan_start = self.spans[..search_end].partition_point(|s| s.start < start);
        while scan_start > 0 && self.prefix_max_end[scan_start - 1] >= start {
            scan_start -= 1;
        }

        self.spans[scan_start..search_end]
            .iter()
            .filter(move |s| s.kind == kind && s.intersects(start, end))
    }

    /// Iterate all spans in order.
    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    /// Iterate spans of one kind in order.
    pub fn of_kind(&self, kind: FormatKind) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.kind == kind)
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Remove every span.
    pub fn clear(&mut self) {
        self.spans.clear();
        self.prefix_max_end.clear();
    }

    /// Shift spans for `len` characters inserted at `pos`.
    pub fn update_for_insertion(&mut self, pos: usize, len: usize) {
        if len == 0 {
            return;
        }

        for span in &mut self.spans {
            let extends = span.boundary == Boundary::InclusiveEnd;
            if span.start > pos || (span.start == pos && !(span.is_empty() && extends)) {
                span.start += len;
                span.end += len;
            } else if span.end > pos || (span.end == pos && extends) {
                span.end += len;
            }
        }
        self.resort();
    }

    /// Shift and clamp spans for the deletion of `[start, end)`.
    ///
    /// Spans that become empty are dropped, except inline spans that extend at their end: those
    /// remain as zero-width carets so the next typed text keeps the format. Links need a
    /// non-empty range and are always dropped.
    pub fn update_for_deletion(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }

        let delta = end - start;
        let clamp = |offset: usize| {
            if offset <= start {
                offset
            } else if offset >= end {
                offset - delta
            } else {
                start
            }
        };

        self.spans.retain_mut(|span| {
            let was_empty = span.is_empty();
            span.start = clamp(span.start);
            span.end = clamp(span.end);
            !span.is_empty()
                || was_empty
                || (span.kind.is_inline()
                    && span.kind != FormatKind::Link
                    && span.boundary == Boundary::InclusiveEnd)
        });
        self.resort();
    }
}
