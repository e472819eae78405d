//! Structured errors with context fields, causal chains and stack traces
//!
//! This crate provides:
//! - [`Error`], built with [`Error::new`] or [`Error::wrap`], carrying a
//!   message, an optional cause, key/value fields and a captured stack
//! - [`merged_fields`] to collect fields across a whole chain, where outer
//!   links shadow inner ones
//! - [`stack_chain`] to get one normalized record per link with resolved
//!   frames, including links created by other error libraries
//! - Short, quoted, default and verbose [`format`] renderings
//!
//! ```
//! use errtrail::{Error, ResultExt};
//!
//! fn read_config() -> errtrail::Result<String> {
//!     std::fs::read_to_string("/nonexistent/app.toml")
//!         .wrap_err("read config")
//!         .map_err(|e| e.with_field("path", "/nonexistent/app.toml"))
//! }
//!
//! let err = read_config().unwrap_err();
//! assert!(err.to_string().starts_with("read config: "));
//! assert_eq!(err.stack_chain().len(), 2);
//! ```
//!
//! Stack capture needs the default `full-backtrace` feature; without it every
//! stack resolves to zero frames.

#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod stack;

pub use builder::ErrorBuilder;
pub use error::{
    merged_field_pairs, merged_fields, BoxError, Error, FieldValue, Fields, LoggingTransformer,
    OptionExt, Result, ResultExt,
};
pub use format::{default_text, fields_text, quoted_text, short_text, verbose_text};
pub use stack::{
    register_adapter, register_tracer, stack_chain, stack_chain_opt, ChainRecord, Frame, RecordSnapshot, Stack,
    StackAdapter, StackTracer,
};
