//! [`FormattedText`] to markup.
//!
//! Lines are emitted in order. Bulleted or quoted lines become `<li>`/`<blockquote>` blocks,
//! everything else is inline content with `<br>` for line breaks. Inline formatting is rendered
//! with a minimal tag stack: at every span boundary only the tags that differ are closed and
//! reopened, with links always outermost.

use richtext_core::{FormatKind, FormattedText, Span};
use std::fmt::Write as _;

const INLINE_ORDER: [FormatKind; 4] = [
    FormatKind::Bold,
    FormatKind::Italic,
    FormatKind::Underline,
    FormatKind::Strike,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    bullet: bool,
    quote: bool,
}

impl Block {
    fn of_line(text: &FormattedText, start: usize, end: usize) -> Option<Self> {
        if start == end {
            return None;
        }
        let block = Self {
            bullet: text.spans().contains_kind(FormatKind::Bullet, start, end),
            quote: text.spans().contains_kind(FormatKind::Quote, start, end),
        };
        (block.bullet || block.quote).then_some(block)
    }

    /// A bulleted line outside a quote; consecutive ones share a `<ul>`.
    fn is_list_item(self) -> bool {
        self.bullet && !self.quote
    }
}

/// An open inline tag. Links are keyed by their span so distinct links never fuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'a> {
    Link { start: usize, url: &'a str },
    Format(FormatKind),
}

impl Tag<'_> {
    fn write_open(&self, out: &mut String) {
        match self {
            Tag::Link { url, .. } => {
                out.push_str("<a href=\"");
                escape_attr(out, url);
                out.push_str("\">");
            }
            Tag::Format(kind) => {
                let _ = write!(out, "<{}>", tag_name(*kind));
            }
        }
    }

    fn write_close(&self, out: &mut String) {
        match self {
            Tag::Link { .. } => out.push_str("</a>"),
            Tag::Format(kind) => {
                let _ = write!(out, "</{}>", tag_name(*kind));
            }
        }
    }
}

fn tag_name(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Bold => "b",
        FormatKind::Italic => "i",
        FormatKind::Underline => "u",
        FormatKind::Strike => "del",
        FormatKind::Link => "a",
        FormatKind::Bullet => "li",
        FormatKind::Quote => "blockquote",
    }
}

struct Encoder<'a> {
    chars: Vec<char>,
    inline: Vec<&'a Span>,
    stack: Vec<Tag<'a>>,
    out: String,
}

pub(crate) fn encode(text: &FormattedText) -> String {
    let mut encoder = Encoder {
        chars: text.rope().chars().collect(),
        inline: text
            .spans()
            .iter()
            .filter(|span| span.kind.is_inline() && !span.is_empty())
            .collect(),
        stack: Vec::new(),
        out: String::new(),
    };

    let lines = line_ranges(&encoder.chars);
    let mut in_list = false;

    for (idx, &(line_start, line_end)) in lines.iter().enumerate() {
        let next = lines.get(idx + 1).copied();
        let next_block = next.and_then(|(start, end)| Block::of_line(text, start, end));

        match Block::of_line(text, line_start, line_end) {
            Some(block) => {
                if block.is_list_item() {
                    if !in_list {
                        encoder.out.push_str("<ul>");
                        in_list = true;
                    }
                    encoder.out.push_str("<li>");
                } else if block.bullet {
                    encoder.out.push_str("<blockquote><ul><li>");
                } else {
                    encoder.out.push_str("<blockquote>");
                }

                encoder.write_runs(line_start, line_start, line_end);
                encoder.close_all();

                if block.is_list_item() {
                    encoder.out.push_str("</li>");
                    if !next_block.is_some_and(Block::is_list_item) {
                        encoder.out.push_str("</ul>");
                        in_list = false;
                    }
                } else if block.bullet {
                    encoder.out.push_str("</li></ul></blockquote>");
                } else {
                    encoder.out.push_str("</blockquote>");
                }

                // The break after a block is implicit unless nothing follows on the next line.
                if next.is_some_and(|(start, end)| start == end) {
                    encoder.out.push_str("<br>");
                }
            }
            None => {
                let end = (line_end + 1).min(encoder.chars.len());
                encoder.write_runs(line_start, line_start, end);
                if next_block.is_some() {
                    encoder.close_all();
                }
            }
        }
    }

    encoder.close_all();
    tracing::debug!(bytes = encoder.out.len(), "encoded markup");
    encoder.out
}

impl<'a> Encoder<'a> {
    fn write_runs(&mut self, line_start: usize, from: usize, to: usize) {
        if from >= to {
            return;
        }

        let mut cuts = vec![from, to];
        for span in &self.inline {
            for offset in [span.start, span.end] {
                if from < offset && offset < to {
                    cuts.push(offset);
                }
            }
        }
        cuts.sort_unstable();
        cuts.dedup();

        for window in cuts.windows(2) {
            let (start, end) = (window[0], window[1]);
            let wanted = self.tags_over(start, end);

            let keep = self
                .stack
                .iter()
                .zip(&wanted)
                .take_while(|(open, want)| open == want)
                .count();
            while self.stack.len() > keep {
                if let Some(tag) = self.stack.pop() {
                    tag.write_close(&mut self.out);
                }
            }
            for tag in &wanted[keep..] {
                tag.write_open(&mut self.out);
                self.stack.push(*tag);
            }

            for pos in start..end {
                self.write_char(line_start, pos);
            }
        }
    }

    fn tags_over(&self, start: usize, end: usize) -> Vec<Tag<'a>> {
        let covers = |span: &&Span| span.start <= start && end <= span.end;
        let mut tags = Vec::new();

        if let Some(link) = self
            .inline
            .iter()
            .filter(|span| span.kind == FormatKind::Link)
            .find(|span| covers(span))
        {
            tags.push(Tag::Link {
                start: link.start,
                url: link.url.as_deref().unwrap_or_default(),
            });
        }
        for kind in INLINE_ORDER {
            if self
                .inline
                .iter()
                .filter(|span| span.kind == kind)
                .any(|span| covers(&span))
            {
                tags.push(Tag::Format(kind));
            }
        }
        tags
    }

    fn close_all(&mut self) {
        while let Some(tag) = self.stack.pop() {
            tag.write_close(&mut self.out);
        }
    }

    fn write_char(&mut self, line_start: usize, pos: usize) {
        let ch = self.chars[pos];
        match ch {
            '\n' => self.out.push_str("<br>"),
            // Only a space following visible text survives whitespace collapsing.
            ' ' if pos > line_start && self.chars[pos - 1] != ' ' => self.out.push(' '),
            ' ' => self.out.push_str("&nbsp;"),
            '&' => self.out.push_str("&amp;"),
            '<' => self.out.push_str("&lt;"),
            '>' => self.out.push_str("&gt;"),
            '"' => self.out.push_str("&quot;"),
            ch if ch.is_whitespace() => {
                let _ = write!(self.out, "&#{};", u32::from(ch));
            }
            ch => self.out.push(ch),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            ch => out.push(ch),
        }
    }
}

/// `[start, end)` of every `'\n'`-separated line, including empty ones.
fn line_ranges(chars: &[char]) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            lines.push((start, idx));
            start = idx + 1;
        }
    }
    lines.push((start, chars.len()));
    lines
}
