//! Markup to [`FormattedText`].

use crate::HtmlError;
use regex::{Captures, Regex};
use richtext_core::{FormatKind, FormattedText, Span};

/// Elements the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Inline(FormatKind),
    Link,
    ListItem,
    Quote,
    List,
    Paragraph,
    LineBreak,
}

impl Element {
    fn from_tag(name: &str) -> Option<Self> {
        let element = match name.to_ascii_lowercase().as_str() {
            "b" | "strong" => Self::Inline(FormatKind::Bold),
            "i" | "em" | "cite" => Self::Inline(FormatKind::Italic),
            "u" | "ins" => Self::Inline(FormatKind::Underline),
            "s" | "strike" | "del" => Self::Inline(FormatKind::Strike),
            "a" => Self::Link,
            "li" => Self::ListItem,
            "blockquote" => Self::Quote,
            "ul" | "ol" => Self::List,
            "p" | "div" => Self::Paragraph,
            "br" => Self::LineBreak,
            _ => return None,
        };
        Some(element)
    }

    /// Elements that start on a fresh line and end with a deferred line break.
    fn is_block(self) -> bool {
        matches!(
            self,
            Self::ListItem | Self::Quote | Self::List | Self::Paragraph
        )
    }
}

#[derive(Debug)]
struct OpenElement {
    element: Element,
    start: usize,
    url: Option<String>,
}

/// Single-pass decoder state.
pub(crate) struct Decoder<'a> {
    entity: &'a Regex,
    href: &'a Regex,
    text: String,
    len: usize,
    pending_break: bool,
    open: Vec<OpenElement>,
    spans: Vec<Span>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(entity: &'a Regex, href: &'a Regex) -> Self {
        Self {
            entity,
            href,
            text: String::new(),
            len: 0,
            pending_break: false,
            open: Vec::new(),
            spans: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, tag: &Regex, markup: &str) -> Result<FormattedText, HtmlError> {
        let mut last = 0;
        for caps in tag.captures_iter(markup) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.text_segment(&markup[last..whole.start()]);
            last = whole.end();
            self.tag(&caps);
        }
        self.text_segment(&markup[last..]);
        self.finish()
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.len += s.chars().count();
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.len += 1;
    }

    fn flush_break(&mut self) {
        if self.pending_break {
            self.pending_break = false;
            self.push_char('\n');
        }
    }

    fn at_line_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }

    fn text_segment(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        // Formatting whitespace between blocks carries no content.
        if raw.chars().all(char::is_whitespace) && (self.pending_break || self.at_line_start()) {
            return;
        }

        self.flush_break();
        let collapsed = collapse_whitespace(raw);
        let decoded = decode_entities(self.entity, &collapsed);
        self.push_str(&decoded);
    }

    fn tag(&mut self, caps: &Captures<'_>) {
        // Comments match without a tag name.
        let Some(name) = caps.get(2) else {
            return;
        };
        let Some(element) = Element::from_tag(name.as_str()) else {
            tracing::trace!(tag = name.as_str(), "ignoring unknown tag");
            return;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            self.close(element);
            return;
        }

        if element == Element::LineBreak {
            if self.pending_break {
                self.flush_break();
            } else {
                self.push_char('\n');
            }
            return;
        }

        self.flush_break();
        if element.is_block() && !self.at_line_start() {
            self.push_char('\n');
        }

        // An anchor without a target stays open as plain text so its closing tag pairs with it.
        let url = if element == Element::Link {
            self.href_of(caps.get(3).map_or("", |m| m.as_str()))
        } else {
            None
        };

        self.open.push(OpenElement {
            element,
            start: self.len,
            url,
        });
    }

    fn close(&mut self, element: Element) {
        if element.is_block() {
            self.pending_break = true;
        }
        let Some(idx) = self.open.iter().rposition(|open| open.element == element) else {
            return;
        };
        let open = self.open.remove(idx);
        self.emit(open, self.len);
    }

    fn emit(&mut self, open: OpenElement, end: usize) {
        if open.start >= end {
            return;
        }
        let span = match open.element {
            Element::Inline(kind) => Span::inline(kind, open.start, end),
            Element::Link => match open.url {
                Some(url) => Span::link(url, open.start, end),
                None => return,
            },
            Element::ListItem => Span::paragraph(FormatKind::Bullet, open.start, end),
            Element::Quote => Span::paragraph(FormatKind::Quote, open.start, end),
            Element::List | Element::Paragraph | Element::LineBreak => return,
        };
        self.spans.push(span);
    }

    fn href_of(&self, attrs: &str) -> Option<String> {
        let caps = self.href.captures(attrs)?;
        let raw = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str();
        let url = decode_entities(self.entity, raw.trim());
        (!url.is_empty()).then_some(url)
    }

    fn finish(mut self) -> Result<FormattedText, HtmlError> {
        let end = self.len;
        while let Some(open) = self.open.pop() {
            self.emit(open, end);
        }

        let mut out = FormattedText::default();
        out.insert(0, &self.text)?;
        for span in self.spans {
            out.push_span(span)?;
        }
        tracing::debug!(
            chars = out.len_chars(),
            spans = out.spans().len(),
            "decoded markup"
        );
        Ok(out)
    }
}

/// Collapse every run of raw whitespace to a single space.
fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn decode_entities(entity: &Regex, text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    entity
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use crate::HtmlCodec;
    use pretty_assertions::assert_eq;
    use richtext_core::{FormatCodec, FormatKind, FormattedText};

    fn decode(markup: &str) -> FormattedText {
        HtmlCodec::new().decode(markup).unwrap()
    }

    fn spans(text: &FormattedText) -> Vec<(FormatKind, usize, usize)> {
        text.spans().iter().map(|s| (s.kind, s.start, s.end)).collect()
    }

    #[test]
    fn test_inline_tags_and_aliases() {
        let text = decode("<b>a</b><strong>b</strong><em>c</em><del>d</del><ins>e</ins>");
        assert_eq!(text.text(), "abcde");
        assert_eq!(
            spans(&text),
            vec![
                (FormatKind::Bold, 0, 1),
                (FormatKind::Bold, 1, 2),
                (FormatKind::Italic, 2, 3),
                (FormatKind::Strike, 3, 4),
                (FormatKind::Underline, 4, 5),
            ]
        );
    }

    #[test]
    fn test_entities_and_whitespace() {
        let text = decode("a  &amp;\n\tb&nbsp;&nbsp;c &#x41;&#66; &lt;&bogus;");
        assert_eq!(text.text(), "a & b  c AB <&bogus;");
        assert_eq!(decode("x < y").text(), "x < y");
    }

    #[test]
    fn test_links() {
        let text = decode(r#"<a href="http://a?x=1&amp;y=2">go</a> <a>plain</a> <a href=''>no</a>"#);
        assert_eq!(text.text(), "go plain no");
        let links: Vec<_> = text
            .spans_of(FormatKind::Link)
            .map(|s| (s.start, s.end, s.url.clone()))
            .collect();
        assert_eq!(links, vec![(0, 2, Some("http://a?x=1&y=2".to_string()))]);
    }

    #[test]
    fn test_anchor_without_href_inside_link() {
        let text = decode(r#"<a href="http://x">aa<a>bb</a>cc</a>"#);
        assert_eq!(text.text(), "aabbcc");
        let links: Vec<_> = text
            .spans_of(FormatKind::Link)
            .map(|s| (s.start, s.end, s.url.clone()))
            .collect();
        assert_eq!(links, vec![(0, 6, Some("http://x".to_string()))]);
    }

    #[test]
    fn test_block_breaks() {
        let text = decode("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul><blockquote>q</blockquote>tail");
        assert_eq!(text.text(), "one\ntwo\nq\ntail");
        assert_eq!(
            spans(&text),
            vec![
                (FormatKind::Bullet, 0, 3),
                (FormatKind::Bullet, 4, 7),
                (FormatKind::Quote, 8, 9),
            ]
        );
    }

    #[test]
    fn test_br_after_block_consumes_break() {
        assert_eq!(decode("<li>a</li><br>b").text(), "a\nb");
        assert_eq!(decode("<li>a</li><br><br>b").text(), "a\n\nb");
        assert_eq!(decode("a<br>b<br>").text(), "a\nb\n");
        assert_eq!(decode("<blockquote>a</blockquote>").text(), "a");
    }

    #[test]
    fn test_unknown_tags_and_comments() {
        let text = decode("<span class=\"x\">a<!-- <b>not bold</b> --></span><b>b");
        assert_eq!(text.text(), "ab");
        assert_eq!(spans(&text), vec![(FormatKind::Bold, 1, 2)]);
    }

    #[test]
    fn test_paragraph_starts_new_line() {
        let text = decode("<b>Bold</b><p><i>Italic</i><br><br>");
        assert_eq!(text.text(), "Bold\nItalic\n\n");
        assert_eq!(
            spans(&text),
            vec![(FormatKind::Bold, 0, 4), (FormatKind::Italic, 5, 11)]
        );
    }
}
