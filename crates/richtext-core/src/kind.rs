//! Formatting kinds and their static classification.
//!
//! The vocabulary is closed: every branch over a kind is an exhaustive `match`, so adding a kind
//! is a compile error everywhere its behaviour has to be decided.

use crate::error::FormatError;
use std::fmt;
use std::str::FromStr;

/// A formatting kind that can be applied to a range of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatKind {
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Underlined text.
    Underline,
    /// Struck-through text.
    Strike,
    /// Bulleted list item (whole lines only).
    Bullet,
    /// Block quote (whole lines only).
    Quote,
    /// Hyperlink; carries the target URL as payload.
    Link,
}

/// What kind of payload a span of a given kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// No payload.
    None,
    /// A non-empty URL string.
    Url,
}

/// Static properties of a [`FormatKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Textual identifier (see [`FormatKind::from_str`]).
    pub name: &'static str,
    /// Spans of this kind cover whole lines only.
    pub paragraph: bool,
    /// Spans of this kind may be cut into sub-ranges and merged with neighbours.
    pub splittable: bool,
    /// Payload carried by spans of this kind.
    pub payload: PayloadShape,
}

impl FormatKind {
    /// Every kind, in a stable order.
    pub const ALL: [FormatKind; 7] = [
        FormatKind::Bold,
        FormatKind::Italic,
        FormatKind::Underline,
        FormatKind::Strike,
        FormatKind::Bullet,
        FormatKind::Quote,
        FormatKind::Link,
    ];

    /// Paragraph kinds, in normalization order.
    pub const PARAGRAPH: [FormatKind; 2] = [FormatKind::Bullet, FormatKind::Quote];

    /// Static classification of this kind.
    pub const fn info(self) -> KindInfo {
        match self {
            FormatKind::Bold => KindInfo::inline("bold"),
            FormatKind::Italic => KindInfo::inline("italic"),
            FormatKind::Underline => KindInfo::inline("underline"),
            FormatKind::Strike => KindInfo::inline("strike"),
            FormatKind::Bullet => KindInfo::paragraph("bullet"),
            FormatKind::Quote => KindInfo::paragraph("quote"),
            FormatKind::Link => KindInfo {
                name: "link",
                paragraph: false,
                splittable: false,
                payload: PayloadShape::Url,
            },
        }
    }

    /// Textual identifier of this kind.
    pub const fn name(self) -> &'static str {
        self.info().name
    }

    /// Returns `true` for kinds constrained to whole lines (Bullet, Quote).
    pub const fn is_paragraph(self) -> bool {
        self.info().paragraph
    }

    /// Returns `true` for kinds applicable to arbitrary character ranges.
    pub const fn is_inline(self) -> bool {
        !self.is_paragraph()
    }

    /// Returns `true` unless the kind is [`FormatKind::Link`].
    pub const fn is_splittable(self) -> bool {
        self.info().splittable
    }

    /// Payload shape carried by spans of this kind.
    pub const fn payload(self) -> PayloadShape {
        self.info().payload
    }
}

impl KindInfo {
    const fn inline(name: &'static str) -> Self {
        Self {
            name,
            paragraph: false,
            splittable: true,
            payload: PayloadShape::None,
        }
    }

    const fn paragraph(name: &'static str) -> Self {
        Self {
            name,
            paragraph: true,
            splittable: true,
            payload: PayloadShape::None,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FormatError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        for kind in FormatKind::ALL {
            assert_eq!(
                kind.is_paragraph(),
                matches!(kind, FormatKind::Bullet | FormatKind::Quote)
            );
            assert_eq!(kind.is_splittable(), kind != FormatKind::Link);
        }
        assert_eq!(FormatKind::Link.payload(), PayloadShape::Url);
        assert_eq!(FormatKind::Bold.payload(), PayloadShape::None);
    }

    #[test]
    fn test_parse_names() {
        for kind in FormatKind::ALL {
            assert_eq!(kind.name().parse::<FormatKind>().unwrap(), kind);
        }
        assert_eq!("  Quote ".parse::<FormatKind>().unwrap(), FormatKind::Quote);
    }

    #[test]
    fn test_unknown_kind() {
        let err = "heading".parse::<FormatKind>().unwrap_err();
        assert_eq!(err, FormatError::UnknownKind("heading".to_string()));
    }
}
