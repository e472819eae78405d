//! Display and trait implementations for Error

use super::types::Error;
use crate::format::{Quoted, Verbose, WithFields};
use std::fmt;

/// `{}` renders the message chain, `{:#}` the verbose per-link view.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return fmt::Display::fmt(&Verbose(self), f);
        }

        match (self.message.is_empty(), &self.cause) {
            (true, None) => f.write_str("error"),
            (false, None) => f.write_str(&self.message),
            (true, Some(cause)) => write!(f, "{cause}"),
            (false, Some(cause)) => write!(f, "{}: {cause}", self.message),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("fields", &self.fields)
            .field("cause", &self.cause)
            .field("stack", &self.stack)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Error {
    /// Message chain in double quotes
    #[must_use]
    pub fn quoted(&self) -> Quoted<'_> {
        Quoted(self)
    }

    /// Message chain followed by the merged fields, e.g. `failed: io[k=v]`
    #[must_use]
    pub fn with_fields_text(&self) -> WithFields<'_> {
        WithFields(self)
    }

    /// Per-link message, fields and frames
    #[must_use]
    pub fn verbose(&self) -> Verbose<'_> {
        Verbose(self)
    }
}
