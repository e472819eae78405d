//! Logging setup and error reporting
//!
//! Provides env_logger-based initialization and a reporter that emits an
//! error chain through the standard `log` crate: the one-line form with merged
//! fields at `error` level and the per-link verbose form at `debug` level.

use crate::error::merged_field_pairs;
use crate::format::{Verbose, WithFields};
use log::{debug, error};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging setup and error reporting entry points
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (call once at application startup).
    ///
    /// Levels come from `RUST_LOG`, e.g. `RUST_LOG=errtrail=debug`.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log `err` with its merged fields, and its verbose chain at debug level.
    pub fn report(err: &(dyn std::error::Error + 'static)) {
        error!("{}", WithFields(err));
        if log::log_enabled!(log::Level::Debug) {
            debug!("error chain:\n{}", Verbose(err));
        }
    }

    /// Merged fields rendered as `key=value` strings, for loggers that take
    /// their structured context as a flat list.
    #[must_use]
    pub fn field_args(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
        merged_field_pairs(err)
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}
