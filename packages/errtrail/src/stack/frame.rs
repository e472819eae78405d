//! Resolved stack frames

use serde::Serialize;
use std::fmt;

/// A single resolved call site.
///
/// Frames are produced by [`Stack::resolve`](super::Stack::resolve) or by a
/// foreign [`StackAdapter`](super::StackAdapter). They are immutable once built.
/// Serializes as `{"file": .., "func": .., "line": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    file: String,
    #[serde(rename = "func")]
    function: String,
    line: u32,
}

impl Frame {
    /// Build a frame from already-resolved symbol information.
    #[must_use]
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// Source file of the call site
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Fully qualified function name, without the symbol hash
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// 1-based line number
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// Renders as `function\n\tfile:line`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\t{}:{}", self.function, self.file, self.line)
    }
}
