//! Command Interface Layer
//!
//! Wraps the engine operations in a single command enum, for hosts that route toolbar buttons,
//! menu items or scripted actions through one entry point.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{CommandResult, FormatCommand, FormatKind, SpanEngine};
//!
//! let mut engine = SpanEngine::new("Hello World");
//!
//! engine.execute(FormatCommand::Toggle { kind: FormatKind::Italic, start: 6, end: 11 }).unwrap();
//!
//! let result = engine
//!     .execute(FormatCommand::Has { kind: FormatKind::Italic, start: 6, end: 11 })
//!     .unwrap();
//! assert_eq!(result, CommandResult::Bool(true));
//!
//! // Batch execute commands
//! let commands = vec![
//!     FormatCommand::Insert { offset: 11, text: "!".to_string() },
//!     FormatCommand::SetLink { url: "https://example.com".to_string(), start: 0, end: 5 },
//! ];
//! engine.execute_batch(commands).unwrap();
//! assert_eq!(engine.text(), "Hello World!");
//! ```

use crate::engine::{LinkSpan, SpanEngine};
use crate::error::FormatError;
use crate::kind::FormatKind;

/// A formatting or editing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    /// Apply a kind over a range
    Set {
        /// Formatting kind.
        kind: FormatKind,
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Remove a kind from a range
    Remove {
        /// Formatting kind.
        kind: FormatKind,
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Toggle a kind over a range
    Toggle {
        /// Formatting kind.
        kind: FormatKind,
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Query whether a range is fully formatted
    Has {
        /// Formatting kind.
        kind: FormatKind,
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Remove every kind from a range
    ClearFormat {
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Link a range
    SetLink {
        /// Link target.
        url: String,
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Look up the link at an offset
    GetLink {
        /// Character offset.
        offset: usize,
    },
    /// Insert text
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete text
    Delete {
        /// Start offset in characters.
        start: usize,
        /// End offset in characters (exclusive).
        end: usize,
    },
    /// Re-align paragraph spans
    Normalize,
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Success, returns a predicate result
    Bool(bool),
    /// Success, returns the link lookup result
    Link(Option<LinkSpan>),
}

impl SpanEngine {
    /// Execute a single command.
    pub fn execute(&mut self, command: FormatCommand) -> Result<CommandResult, FormatError> {
        tracing::trace!(?command, "execute");
        match command {
            FormatCommand::Set { kind, start, end } => {
                self.set(kind, start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::Remove { kind, start, end } => {
                self.remove(kind, start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::Toggle { kind, start, end } => {
                self.toggle(kind, start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::Has { kind, start, end } => {
                Ok(CommandResult::Bool(self.has(kind, start, end)?))
            }
            FormatCommand::ClearFormat { start, end } => {
                self.clear_format_in(start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::SetLink { url, start, end } => {
                self.set_link(&url, start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::GetLink { offset } => Ok(CommandResult::Link(self.link_at(offset)?)),
            FormatCommand::Insert { offset, text } => {
                self.insert_text(offset, &text)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::Delete { start, end } => {
                self.delete_text(start, end)?;
                Ok(CommandResult::Success)
            }
            FormatCommand::Normalize => Ok(CommandResult::Bool(self.normalize_paragraphs())),
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<FormatCommand>,
    ) -> Result<Vec<CommandResult>, FormatError> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }
}
