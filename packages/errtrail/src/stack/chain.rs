//! Normalized per-link view of a causal chain

use super::{foreign, Frame};
use crate::error::{Error, Fields};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

const SEPARATOR: &str = ": ";

/// One link of a causal chain after normalization.
#[derive(Clone)]
pub struct ChainRecord<'a> {
    message: String,
    fields: Option<Fields>,
    frames: Vec<Frame>,
    native: bool,
    error: &'a (dyn StdError + 'static),
}

impl<'a> ChainRecord<'a> {
    fn native(error: &'a Error, source: &'a (dyn StdError + 'static)) -> Self {
        Self {
            message: error.message().to_string(),
            fields: error.fields().filter(|fields| !fields.is_empty()).cloned(),
            frames: error.stack().resolve(),
            native: true,
            error: source,
        }
    }

    fn foreign(error: &'a (dyn StdError + 'static)) -> Self {
        Self {
            message: error.to_string(),
            fields: None,
            frames: foreign::foreign_frames(error),
            native: false,
            error,
        }
    }

    /// This link's own contribution to the rendered message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fields attached directly to this link
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }

    /// Resolved frames, innermost first
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Whether the link was built by this crate
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.native
    }

    /// The error value this record describes, for identity comparison
    #[must_use]
    pub fn error(&self) -> &'a (dyn StdError + 'static) {
        self.error
    }
}

/// Owned copy of a [`ChainRecord`] for structured log output.
///
/// Serializes as `{"error_message": .., "fields": .., "stack_trace": [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    /// The link's own message
    pub error_message: String,
    /// Fields attached directly to the link
    pub fields: Option<Fields>,
    /// Resolved frames, innermost first
    pub stack_trace: Vec<Frame>,
}

impl From<&ChainRecord<'_>> for RecordSnapshot {
    fn from(record: &ChainRecord<'_>) -> Self {
        Self {
            error_message: record.message.clone(),
            fields: record.fields.clone(),
            stack_trace: record.frames.clone(),
        }
    }
}

impl ChainRecord<'_> {
    /// Detach this record from the error it describes.
    #[must_use]
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot::from(self)
    }
}

impl fmt::Debug for ChainRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainRecord")
            .field("message", &self.message)
            .field("fields", &self.fields)
            .field("frames", &self.frames)
            .field("native", &self.native)
            .finish()
    }
}

impl PartialEq for ChainRecord<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.fields == other.fields
            && self.frames == other.frames
            && self.native == other.native
            && std::ptr::eq(
                self.error as *const dyn StdError as *const (),
                other.error as *const dyn StdError as *const (),
            )
    }
}

/// Walk the chain starting at `error` and normalize it, head first.
///
/// Native links report their own message, fields and stack. Foreign links
/// report their full `Display` text and whatever frames a registered
/// [`StackAdapter`](super::StackAdapter) provides. Synthetic duplicates from
/// foreign wrappers are then collapsed and eagerly concatenated cause text is
/// stripped from each message.
#[must_use]
pub fn stack_chain<'a>(error: &'a (dyn StdError + 'static)) -> Vec<ChainRecord<'a>> {
    let mut records = Vec::new();
    let mut next = Some(error);
    while let Some(link) = next {
        let record = match link.downcast_ref::<Error>() {
            Some(native) => ChainRecord::native(native, link),
            None => ChainRecord::foreign(link),
        };
        records.push(record);
        next = link.source();
    }
    strip_suffixes(collapse(records))
}

/// [`stack_chain`] for an error that may be absent. `None` yields no records.
#[must_use]
pub fn stack_chain_opt<'a>(error: Option<&'a (dyn StdError + 'static)>) -> Vec<ChainRecord<'a>> {
    error.map(stack_chain).unwrap_or_default()
}

/// Drop foreign links that repeat the message of the link above them without
/// adding frames, e.g. the message half of a two-link foreign wrap.
fn collapse(mut records: Vec<ChainRecord<'_>>) -> Vec<ChainRecord<'_>> {
    let mut i = records.len();
    while i > 1 {
        i -= 1;
        let duplicate = {
            let (tail, above) = (&records[i], &records[i - 1]);
            !tail.native && tail.frames.is_empty() && tail.message == above.message
        };
        if duplicate {
            let removed = records.remove(i);
            merge_missing(&mut records[i - 1].fields, removed.fields);
        }
    }
    records
}

/// Copy keys from `src` that `dst` does not already have.
fn merge_missing(dst: &mut Option<Fields>, src: Option<Fields>) {
    let Some(src) = src.filter(|fields| !fields.is_empty()) else {
        return;
    };
    let dst = dst.get_or_insert_with(Fields::new);
    for (key, value) in src {
        dst.entry(key).or_insert(value);
    }
}

/// Reduce each message to the link's own text when it ends with the rendered
/// text of everything beneath it.
///
/// Only an exact `": " + suffix` match is stripped; a foreign wrapper that
/// stores just its own text and happens to end the same way would lose that
/// tail.
fn strip_suffixes(mut records: Vec<ChainRecord<'_>>) -> Vec<ChainRecord<'_>> {
    let mut rendered = String::new();
    for record in records.iter_mut().rev() {
        if !rendered.is_empty() {
            let suffix = format!("{SEPARATOR}{rendered}");
            if let Some(own) = record.message.strip_suffix(suffix.as_str()) {
                record.message = own.to_string();
            }
        }
        rendered = match (record.message.is_empty(), rendered.is_empty()) {
            (true, _) => rendered,
            (false, true) => record.message.clone(),
            (false, false) => format!("{}{SEPARATOR}{rendered}", record.message),
        };
    }
    records
}
