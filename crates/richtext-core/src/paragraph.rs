//! Paragraph span algebra (Bullet, Quote).
//!
//! Paragraph spans always cover exactly one non-empty line. Selections are snapped outwards to
//! line boundaries before any operation.

use crate::error::FormatError;
use crate::kind::FormatKind;
use crate::lines::line_ranges;
use crate::spans::Span;
use crate::text::FormattedText;

impl FormattedText {
    /// Snap `[start, end)` outwards to whole lines.
    pub fn paragraph_bounds(&self, start: usize, end: usize) -> Result<(usize, usize), FormatError> {
        self.check_range(start, end)?;
        Ok((self.line_start(start)?, self.line_end(end)?))
    }

    /// Give every non-empty line touched by `[start, end)` a `kind` span.
    pub fn set_paragraph(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        debug_assert!(kind.is_paragraph());
        let (start, end) = self.paragraph_bounds(start, end)?;
        Ok(self.cover_lines(kind, start, end))
    }

    /// Delete every `kind` span on the lines touched by `[start, end)`.
    pub fn remove_paragraph(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        debug_assert!(kind.is_paragraph());
        let (start, end) = self.paragraph_bounds(start, end)?;
        let touched = self.spans().query(kind, start, end);
        for span in &touched {
            self.spans_mut().remove(span);
        }
        Ok(!touched.is_empty())
    }

    /// Check whether every non-empty line touched by `[start, end)` carries `kind`.
    ///
    /// Empty lines never carry paragraph spans and are skipped; a range made only of empty
    /// lines is not "full".
    pub fn is_full_of_paragraphs(
        &self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        let (start, end) = self.paragraph_bounds(start, end)?;
        if start == end {
            return Ok(false);
        }

        let mut any_line = false;
        for (line_start, line_end) in line_ranges(self.rope(), start, end) {
            if line_start == line_end {
                continue;
            }
            if !self.spans().contains_kind(kind, line_start, line_end) {
                return Ok(false);
            }
            any_line = true;
        }
        Ok(any_line)
    }

    /// Remove `kind` if every touched line carries it, apply it otherwise.
    pub fn toggle_paragraph(
        &mut self,
        kind: FormatKind,
        start: usize,
        end: usize,
    ) -> Result<bool, FormatError> {
        if self.is_full_of_paragraphs(kind, start, end)? {
            self.remove_paragraph(kind, start, end)
        } else {
            self.set_paragraph(kind, start, end)
        }
    }

    /// Re-align `kind` spans to whole lines after the text changed.
    ///
    /// A span that no longer covers exactly one non-empty line is replaced by one span per
    /// non-empty line it now touches. Returns `true` if anything changed; a second run on the
    /// result never does.
    pub fn normalize_paragraphs(&mut self, kind: FormatKind) -> bool {
        debug_assert!(kind.is_paragraph());
        let snapshot: Vec<Span> = self.spans_of(kind).cloned().collect();
        let mut changed = false;

        for span in snapshot {
            let Ok(start) = self.line_start(span.start) else {
                continue;
            };
            let Ok(end) = self.line_end(span.end) else {
                continue;
            };
            let aligned = !span.is_empty()
                && span.start == start
                && self.line_end(span.start).is_ok_and(|line_end| line_end == span.end);
            if aligned {
                continue;
            }

            tracing::debug!(
                %kind,
                start = span.start,
                end = span.end,
                "re-aligning paragraph span"
            );
            self.spans_mut().remove(&span);
            self.cover_lines(kind, start, end);
            changed = true;
        }

        changed
    }

    /// Returns `true` if any line got a new span.
    fn cover_lines(&mut self, kind: FormatKind, start: usize, end: usize) -> bool {
        let lines: Vec<_> = line_ranges(self.rope(), start, end).collect();
        let mut changed = false;
        for (line_start, line_end) in lines {
            if line_start != line_end && !self.spans().contains_kind(kind, line_start, line_end) {
                self.spans_mut()
                    .insert(Span::paragraph(kind, line_start, line_end));
                changed = true;
            }
        }
        changed
    }
}
