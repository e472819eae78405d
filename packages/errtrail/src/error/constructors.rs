//! Error constructors and methods

use super::types::{BoxError, Error};
use super::{fields, FieldValue, Fields};
use crate::stack::{self, ChainRecord, Stack};

impl Error {
    /// Create a new error with the given message and no cause.
    ///
    /// ```
    /// use errtrail::Error;
    ///
    /// let err = Error::new("connection refused").with_field("port", 8080);
    /// assert_eq!(err.to_string(), "connection refused");
    /// ```
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            fields: None,
            stack: Stack::capture(),
        }
    }

    /// Create an error whose cause is `cause`.
    ///
    /// Anything convertible into a boxed `Error + Send + Sync` works,
    /// including other [`Error`]s, `std::io::Error`, `anyhow::Error` and
    /// plain strings.
    ///
    /// ```
    /// use errtrail::Error;
    ///
    /// let err = Error::wrap(Error::wrap(Error::new("a"), "b"), "c");
    /// assert_eq!(err.to_string(), "c: b: a");
    /// ```
    #[must_use]
    pub fn wrap(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
            fields: None,
            stack: Stack::capture(),
        }
    }

    /// [`Error::wrap`] for a cause that may be absent.
    ///
    /// With `None` the result behaves like [`Error::new`]: it renders only
    /// `message` and reports no source.
    #[must_use]
    pub fn wrap_opt<E>(cause: Option<E>, message: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            message: message.into(),
            cause: cause.map(Into::into),
            fields: None,
            stack: Stack::capture(),
        }
    }

    /// Attach a context field, replacing any previous value for `key`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set_field(key, value);
        self
    }

    /// In-place form of [`Error::with_field`].
    ///
    /// Empty keys are ignored.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        fields::insert_field(&mut self.fields, key.into(), value.into());
        self
    }

    /// Replace the whole field map, as the builder does.
    pub(crate) fn set_fields(&mut self, fields: Option<Fields>) {
        self.fields = fields.filter(|fields| !fields.is_empty());
    }

    /// This link's own message, without the cause
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The direct cause, one level only
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Fields attached to this link only
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }

    /// Stack captured when this link was built
    #[must_use]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Fields of the whole chain, outer links shadowing inner ones
    #[must_use]
    pub fn merged_fields(&self) -> Option<Fields> {
        super::merged_fields(self)
    }

    /// Normalized per-link records of the whole chain, head first
    #[must_use]
    pub fn stack_chain(&self) -> Vec<ChainRecord<'_>> {
        stack::stack_chain(self)
    }
}
