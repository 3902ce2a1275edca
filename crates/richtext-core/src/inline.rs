//! Inline span algebra (Bold, Italic, Underline, Strike, Link).
//!
//! Every mutation reports whether the span set actually changed.

use crate::error::FormatError;
use crate::kind::FormatKind;
use crate::spans::{Boundary, Span};
use crate::text::FormattedText;

impl FormattedText {
    /// Apply an inline `kind` over `[start, end)`.
    ///
    /// A zero-width range only marks spans ending at `end` as extending, so text typed there
    /// inherits the format. Otherwise overlapping spans are replaced by one span, merged with
    /// same-kind neighbours when the kind is splittable. `url` is required for links and
    /// ignored for every other kind.
    pub fn set_inline(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
        url: Option<&str>,
    ) -> Result<bool, FormatError> {
        debug_assert!(kind.is_inline());
        self.check_range(start, end)?;

        if start == end {
            return Ok(self.set_boundary_at(kind, end, Boundary::InclusiveEnd));
        }

        let new_span = match kind {
            FormatKind::Link => match url {
                Some(url) if !url.is_empty() => Span::link(url, start, end),
                _ => {
                    return Err(FormatError::InvalidFormatRequest(
                        "links must be created with a URL",
                    ));
                }
            },
            _ => Span::inline(kind, start, end),
        };
        if self.already_applied(&new_span) {
            return Ok(false);
        }

        self.remove_inline(kind, start, end)?;

        let mut span = new_span;
        if kind.is_splittable() {
            for before in self.spans().query(kind, span.start, span.start) {
                span.start = span.start.min(before.start);
                self.spans_mut().remove(&before);
            }
            for after in self.spans().query(kind, span.end, span.end) {
                span.end = span.end.max(after.end);
                self.spans_mut().remove(&after);
            }
        }

        self.spans_mut().insert(span);
        Ok(true)
    }

    /// Remove an inline `kind` from `[start, end)`.
    ///
    /// A zero-width range marks spans ending at `end` as not extending. Otherwise every
    /// overlapping span is deleted; for splittable kinds the parts outside the range survive.
    pub fn remove_inline(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        debug_assert!(kind.is_inline());
        self.check_range(start, end)?;

        if start == end {
            return Ok(self.set_boundary_at(kind, end, Boundary::Exclusive));
        }

        let overlapping = self.spans().query(kind, start, end);
        for span in &overlapping {
            self.spans_mut().remove(span);

            if kind.is_splittable() {
                if span.start < start {
                    self.set_inline(kind, span.start, start, None)?;
                }
                if end < span.end {
                    self.set_inline(kind, end, span.end, None)?;
                }
            }
        }
        Ok(!overlapping.is_empty())
    }

    /// Check whether `[start, end)` is completely covered by `kind`.
    ///
    /// For a caret, the format is active if a span strictly surrounds it or a span ending at it
    /// extends through inserted text.
    pub fn is_fully_spanned(
        &self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        self.check_range(start, end)?;
        let mut spans = self.spans().query(kind, start, end);

        if start == end {
            return Ok(spans.iter().any(|span| {
                (span.start < start && end < span.end)
                    || (span.end == end && span.boundary == Boundary::InclusiveEnd)
            }));
        }

        spans.sort_by_key(|span| span.start);
        let mut covered = start;
        for span in &spans {
            if span.start > covered {
                return Ok(false);
            }
            covered = covered.max(span.end);
            if covered >= end {
                return Ok(true);
            }
        }
        Ok(covered >= end)
    }

    /// Remove `kind` if the range is fully covered, apply it otherwise.
    pub fn toggle_inline(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
        url: Option<&str>,
    ) -> Result<bool, FormatError> {
        if self.is_fully_spanned(kind, start, end)? {
            self.remove_inline(kind, start, end)
        } else {
            self.set_inline(kind, start, end, url)
        }
    }

    /// A single existing span already equal to `span` or, for splittable kinds, covering it
    /// without a boundary flip.
    fn already_applied(&self, span: &Span) -> bool {
        match self.spans().query(span.kind, span.start, span.end).as_slice() {
            [only] if span.kind.is_splittable() => {
                only.start <= span.start
                    && span.end <= only.end
                    && (span.end < only.end || only.boundary == span.boundary)
            }
            [only] => only == span,
            _ => false,
        }
    }

    fn set_boundary_at(&mut self, kind: FormatKind, pos: usize, boundary: Boundary) -> bool {
        let mut changed = false;
        for span in self.spans().query(kind, pos, pos) {
            if span.end == pos && span.boundary != boundary {
                changed |= self.spans_mut().set_boundary(&span, boundary);
            }
        }
        changed
    }
}
