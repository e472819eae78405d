//! Structured error type with context fields and cause chaining
//!
//! Provides:
//! - [`Error`], a chain link carrying a message, cause, fields and stack
//! - Field merging across whole chains with outer-wins shadowing
//! - Extension traits and macros for wrapping at `?` sites
//! - Logging setup and error reporting

pub mod constructors;
pub mod display;
pub mod extensions;
pub mod fields;
pub mod logging;
pub mod macros;
pub mod types;

pub use extensions::{OptionExt, ResultExt};
pub use fields::{merged_field_pairs, merged_fields, FieldValue, Fields};
pub use logging::LoggingTransformer;
pub use types::{BoxError, Error, Result};
