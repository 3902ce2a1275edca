//! Change notifications and state snapshots.
//!
//! Observers (toolbars, renderers) subscribe to [`FormatChange`] records emitted by
//! [`SpanEngine`](crate::SpanEngine). A notification is sent only after the mutation is complete
//! and paragraph spans are normalized, so observers never see intermediate states.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{FormatChangeType, FormatKind, SpanEngine};
//! use std::sync::{Arc, Mutex};
//!
//! let mut engine = SpanEngine::new("Hello World");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! engine.subscribe(move |change| sink.lock().unwrap().push(change.change_type));
//!
//! engine.set(FormatKind::Bold, 0, 5).unwrap();
//! assert!(engine.has(FormatKind::Bold, 0, 5).unwrap());
//! assert_eq!(*seen.lock().unwrap(), vec![FormatChangeType::SpansChanged]);
//! ```

use crate::engine::LinkSpan;
use crate::kind::FormatKind;
use std::ops::Range;

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatChangeType {
    /// The span set changed (set/remove/toggle/clear/normalize).
    SpansChanged,
    /// Buffer text changed (spans were shifted and re-normalized).
    TextChanged,
    /// The selection moved.
    SelectionChanged,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChange {
    /// Change type
    pub change_type: FormatChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Affected region (character offset range), if known
    pub affected_region: Option<Range<usize>>,
}

impl FormatChange {
    /// Create a change record without an affected region.
    pub fn new(change_type: FormatChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected_region: None,
        }
    }

    /// Attach the affected character range to this change record.
    pub fn with_region(mut self, region: Range<usize>) -> Self {
        self.affected_region = Some(region);
        self
    }
}

/// Change callback function type
pub type FormatChangeCallback = Box<dyn FnMut(&FormatChange) + Send>;

/// Document state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Buffer length in characters
    pub char_count: usize,
    /// Number of spans of every kind
    pub span_count: usize,
    /// Version number (incremented on every notified change)
    pub version: u64,
}

/// What the current selection looks like to a toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// Selection start offset
    pub start: usize,
    /// Selection end offset
    pub end: usize,
    /// Kinds for which `has` holds over the selection
    pub active: Vec<FormatKind>,
    /// Link at the selection start, if any
    pub link: Option<LinkSpan>,
}

impl SelectionState {
    /// Returns `true` if `kind` is active over the selection.
    pub fn is_active(&self, kind: FormatKind) -> bool {
        self.active.contains(&kind)
    }

    /// Returns `true` for a caret (empty selection).
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}
