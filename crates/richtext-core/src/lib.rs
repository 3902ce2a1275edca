#![warn(missing_docs)]
//! Richtext Core - Headless Rich-Text Span Engine
//!
//! # Overview
//!
//! `richtext-core` applies, removes, queries and toggles formatting (bold, italic, underline,
//! strike-through, links, bulleted lists, block quotes) over ranges of a mutable text buffer.
//! It does not render anything and does not parse markup: a host widget reports text edits and
//! selection offsets, and a codec crate (`richtext-html`) converts to and from markup.
//!
//! # Core Features
//!
//! - **Inline spans**: merge on `set`, split on `remove`, caret-level "format sticks" flags
//! - **Links**: carry their URL explicitly and are never merged or split
//! - **Paragraph spans**: bullets and quotes always cover exactly one whole line
//! - **Normalization**: paragraph spans are re-aligned after every text edit
//! - **Change Notifications**: one notification per completed mutation, never mid-update
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands & Change Notifications            │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  SpanEngine (dispatch by kind, selection)   │  ← Facade
//! ├─────────────────────────────────────────────┤
//! │  Inline algebra  │  Paragraph algebra       │  ← Span rules
//! ├─────────────────────────────────────────────┤
//! │  SpanSet (ordered, pruned range queries)    │  ← Span storage
//! ├─────────────────────────────────────────────┤
//! │  Rope buffer + line-boundary search         │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use richtext_core::{FormatKind, SpanEngine};
//!
//! let mut engine = SpanEngine::new("abc\ndef\nghi");
//!
//! // Paragraph kinds snap to whole lines.
//! engine.set(FormatKind::Bullet, 1, 9).unwrap();
//! let bullets: Vec<_> = engine
//!     .spans_of(FormatKind::Bullet)
//!     .map(|span| (span.start, span.end))
//!     .collect();
//! assert_eq!(bullets, vec![(0, 3), (4, 7), (8, 11)]);
//!
//! // Inline kinds merge with their neighbours.
//! engine.set(FormatKind::Bold, 0, 2).unwrap();
//! engine.set(FormatKind::Bold, 2, 3).unwrap();
//! assert_eq!(engine.spans_of(FormatKind::Bold).count(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`kind`] - Formatting kinds and their static classification
//! - [`lines`] - Line-boundary search
//! - [`spans`] - Span records and the ordered span collection
//! - [`text`] - The formatted text value (buffer + spans)
//! - [`engine`] - The public facade
//! - [`commands`] - Unified command interface
//! - [`state`] - Change notifications and state snapshots
//! - [`config`] - Presentation style values
//! - [`codec`] - Markup codec interface
//!
//! # Offsets
//!
//! All offsets are character offsets (Unicode scalar values). Ranges are half-open; a range with
//! `start == end` is a caret.

pub mod codec;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
mod inline;
pub mod kind;
pub mod lines;
mod paragraph;
pub mod spans;
pub mod state;
pub mod text;

pub use codec::FormatCodec;
pub use commands::{CommandResult, FormatCommand};
pub use config::{FormatStyle, StyleConfigError};
pub use engine::{LinkSpan, SpanEngine};
pub use error::FormatError;
pub use kind::{FormatKind, KindInfo, PayloadShape};
pub use spans::{Boundary, Span, SpanSet};
pub use state::{
    DocumentState, FormatChange, FormatChangeCallback, FormatChangeType, SelectionState,
};
pub use text::FormattedText;
