//! Text renderings of errors and chains
//!
//! | form      | example                                    |
//! |-----------|--------------------------------------------|
//! | short     | `error 2: error 1`                         |
//! | quoted    | `"error 2: error 1"`                       |
//! | default   | `error 2: error 1[k1=v1 k2=v2]`            |
//! | verbose   | one block per link: message, fields, frames |
//!
//! Fields always render in ascending key order.

use crate::error::{merged_fields, Fields};
use crate::stack::{stack_chain, ChainRecord, Frame};
use std::error::Error as StdError;
use std::fmt;

/// Message chain of `error`, as its `Display` renders it.
#[must_use]
pub fn short_text(error: &(dyn StdError + 'static)) -> String {
    error.to_string()
}

/// Message chain in double quotes with escaping.
#[must_use]
pub fn quoted_text(error: &(dyn StdError + 'static)) -> String {
    Quoted(error).to_string()
}

/// Message chain immediately followed by the merged fields.
#[must_use]
pub fn default_text(error: &(dyn StdError + 'static)) -> String {
    WithFields(error).to_string()
}

/// One block per chain link: message, fields and frames, each on its own lines.
#[must_use]
pub fn verbose_text(error: &(dyn StdError + 'static)) -> String {
    Verbose(error).to_string()
}

/// `[k1=v1 k2=v2]`, or an empty string when there is nothing to show.
#[must_use]
pub fn fields_text(fields: Option<&Fields>) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_fields(&mut out, fields);
    out
}

/// `Display` adapter for [`quoted_text`]
#[derive(Clone, Copy)]
pub struct Quoted<'a>(pub &'a (dyn StdError + 'static));

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.to_string())
    }
}

/// `Display` adapter for [`default_text`]
#[derive(Clone, Copy)]
pub struct WithFields<'a>(pub &'a (dyn StdError + 'static));

impl fmt::Display for WithFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        write_fields(f, merged_fields(self.0).as_ref())?;
        Ok(())
    }
}

/// `Display` adapter for [`verbose_text`]
#[derive(Clone, Copy)]
pub struct Verbose<'a>(pub &'a (dyn StdError + 'static));

impl fmt::Display for Verbose<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in stack_chain(self.0) {
            write_record(f, &record)?;
        }
        Ok(())
    }
}

fn write_record(w: &mut impl fmt::Write, record: &ChainRecord<'_>) -> Result<(), fmt::Error> {
    if !record.message().is_empty() {
        w.write_str(record.message())?;
        w.write_char('\n')?;
    }
    if write_fields(w, record.fields())? {
        w.write_char('\n')?;
    }
    if write_frames(w, record.frames())? {
        w.write_char('\n')?;
    }
    Ok(())
}

/// Returns whether anything was written.
fn write_fields(w: &mut impl fmt::Write, fields: Option<&Fields>) -> Result<bool, fmt::Error> {
    let Some(fields) = fields.filter(|fields| !fields.is_empty()) else {
        return Ok(false);
    };
    // BTreeMap iterates in ascending key order
    w.write_char('[')?;
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            w.write_char(' ')?;
        }
        write!(w, "{key}={value}")?;
    }
    w.write_char(']')?;
    Ok(true)
}

/// Returns whether anything was written.
fn write_frames(w: &mut impl fmt::Write, frames: &[Frame]) -> Result<bool, fmt::Error> {
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            w.write_char('\n')?;
        }
        write!(w, "{frame}")?;
    }
    Ok(!frames.is_empty())
}
