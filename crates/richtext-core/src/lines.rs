//! Line-boundary search over the raw buffer.
//!
//! Lines are separated by `'\n'` only. Both functions scan characters directly instead of relying
//! on the rope's line index, whose notion of a line break is wider than ours.

use crate::error::FormatError;
use ropey::Rope;

/// The line terminator.
pub const LINE_BREAK: char = '\n';

/// Offset just after the nearest `'\n'` before `pos`, or `0`.
pub fn line_start(rope: &Rope, pos: usize) -> Result<usize, FormatError> {
    let len = rope.len_chars();
    if pos > len {
        return Err(FormatError::out_of_range(pos, pos, len));
    }

    let mut chars = rope.chars_at(pos);
    let mut offset = pos;
    while let Some(ch) = chars.prev() {
        if ch == LINE_BREAK {
            return Ok(offset);
        }
        offset -= 1;
    }
    Ok(0)
}

/// Offset of the nearest `'\n'` at or after `pos`, or the buffer length.
pub fn line_end(rope: &Rope, pos: usize) -> Result<usize, FormatError> {
    let len = rope.len_chars();
    if pos > len {
        return Err(FormatError::out_of_range(pos, pos, len));
    }

    Ok(rope
        .chars_at(pos)
        .position(|ch| ch == LINE_BREAK)
        .map_or(len, |distance| pos + distance))
}

/// Iterate the line ranges `[line_start, line_end)` touched by `[start, end]`.
///
/// `start` and `end` must already be snapped to line boundaries. The iterator yields every line,
/// including empty ones.
pub(crate) fn line_ranges(
    rope: &Rope,
    start: usize,
    end: usize,
) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let line_start = next?;
        let line_end = line_end(rope, line_start).unwrap_or(rope.len_chars());
        next = (line_end < end).then_some(line_end + 1);
        Some((line_start, line_end))
    })
}
