//! Macros for formatted error creation

/// Create an [`Error`](crate::Error) from a format string.
///
/// ```
/// let id = 7;
/// let err = errtrail::err!("user {id} not found");
/// assert_eq!(err.to_string(), "user 7 not found");
/// ```
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Wrap a cause with a formatted message.
///
/// ```
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let err = errtrail::wrap!(io, "writing {}", "out.log");
/// assert_eq!(err.to_string(), "writing out.log: disk full");
/// ```
#[macro_export]
macro_rules! wrap {
    ($cause:expr, $($arg:tt)*) => {
        $crate::Error::wrap($cause, ::std::format!($($arg)*))
    };
}

/// Return early with a formatted [`Error`](crate::Error).
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::err!($($arg)*).into())
    };
}

/// Bail unless a condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
