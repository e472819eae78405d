//! Reusable field sets for building several errors

use crate::error::{fields, BoxError, Error, FieldValue, Fields};

/// Accumulates fields and stamps them onto every error it builds.
///
/// ```
/// use errtrail::ErrorBuilder;
///
/// let mut builder = ErrorBuilder::new();
/// builder.with("request_id", "r-42");
///
/// let err = builder.build("upstream timed out");
/// assert_eq!(err.with_fields_text().to_string(), "upstream timed out[request_id=r-42]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorBuilder {
    fields: Option<Fields>,
}

impl ErrorBuilder {
    /// Builder without fields
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field for all errors built afterwards.
    ///
    /// Empty keys are ignored, as with [`Error::set_field`].
    pub fn with(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        fields::insert_field(&mut self.fields, key.into(), value.into());
        self
    }

    /// Fields accumulated so far
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }

    /// [`Error::new`] carrying the builder's fields
    #[must_use]
    pub fn build(&self, message: impl Into<String>) -> Error {
        let mut err = Error::new(message);
        err.set_fields(self.fields.clone());
        err
    }

    /// [`Error::wrap`] carrying the builder's fields
    #[must_use]
    pub fn wrap(&self, cause: impl Into<BoxError>, message: impl Into<String>) -> Error {
        let mut err = Error::wrap(cause, message);
        err.set_fields(self.fields.clone());
        err
    }
}
