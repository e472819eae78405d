//! Extension traits for wrapping errors at `?` sites

use super::types::{BoxError, Error, Result};

/// Wrap the error of a `Result` into an [`Error`] with a message.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `message`.
    fn wrap_err(self, message: impl Into<String>) -> Result<T>;

    /// Wrap the error, if any, with a lazily built message.
    fn wrap_err_with<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|cause| Error::wrap(cause, message))
    }

    fn wrap_err_with<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|cause| Error::wrap(cause, message()))
    }
}

/// Turn a missing value into an [`Error`].
pub trait OptionExt<T> {
    /// `Err(Error::new(message))` when the option is empty
    fn ok_or_err(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_err(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| Error::new(message))
    }
}
