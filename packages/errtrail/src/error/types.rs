//! Core error type and aliases

use super::Fields;
use crate::stack::Stack;

/// Boxed cause accepted by [`Error::wrap`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One link of a causal chain: message, optional cause, context fields and
/// the stack captured where the link was built.
pub struct Error {
    /// This link's own message, possibly empty
    pub(super) message: String,
    /// The wrapped error, if any
    pub(super) cause: Option<BoxError>,
    /// Context fields, created on first insert
    pub(super) fields: Option<Fields>,
    /// Addresses captured at construction
    pub(super) stack: Stack,
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
