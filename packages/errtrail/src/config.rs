//! Process-wide stack resolution settings
//!
//! The only tunable is the denylist of qualified-name prefixes used to hide
//! frames that belong to this crate, the stack walker, the standard library
//! and libc runtime, and the test harness. A configuration can be installed once per
//! process with [`configure`]; until then [`current`] hands out the defaults.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

/// Prefixes hidden from resolved stacks unless a custom configuration says otherwise.
pub const DEFAULT_INTERNAL_PREFIXES: &[&str] = &[
    "errtrail::",
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "test::",
    "__rust",
    // libc thread and process entry points
    "start_thread",
    "__clone",
    "__libc_start",
];

static INSTALLED: OnceCell<StackConfig> = OnceCell::new();

/// Errors raised while building or installing a [`StackConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration was already installed for this process
    #[error("stack configuration already installed")]
    AlreadyConfigured,

    /// A denylist entry is empty and would hide every frame
    #[error("internal prefix at index {index} is empty")]
    EmptyPrefix {
        /// Position of the offending entry
        index: usize,
    },

    /// The JSON document could not be parsed
    #[error("invalid stack configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stack resolution settings
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct StackConfig {
    /// Qualified function-name prefixes whose frames are dropped on resolution
    #[serde(default = "default_internal_prefixes")]
    pub internal_prefixes: Vec<String>,
}

fn default_internal_prefixes() -> Vec<String> {
    DEFAULT_INTERNAL_PREFIXES
        .iter()
        .map(|prefix| (*prefix).to_string())
        .collect()
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            internal_prefixes: default_internal_prefixes(),
        }
    }
}

impl StackConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// ```
    /// use errtrail::config::StackConfig;
    ///
    /// let config = StackConfig::from_json(r#"{"internal_prefixes": ["myapp::errors::"]}"#).unwrap();
    /// assert_eq!(config.internal_prefixes, vec!["myapp::errors::".to_string()]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Add another prefix to the denylist
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.internal_prefixes.push(prefix.into());
        self
    }

    /// Reject empty prefixes, which would match every frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.internal_prefixes.iter().position(String::is_empty) {
            Some(index) => Err(ConfigError::EmptyPrefix { index }),
            None => Ok(()),
        }
    }

    /// Frame filter view of this configuration
    #[must_use]
    pub fn filter(&self) -> FrameFilter<'_> {
        FrameFilter {
            prefixes: &self.internal_prefixes,
        }
    }
}

/// Denylist check applied to each resolved function name
#[derive(Clone, Copy, Debug)]
pub struct FrameFilter<'a> {
    prefixes: &'a [String],
}

impl FrameFilter<'_> {
    /// Whether a frame with this qualified name belongs to hidden code.
    ///
    /// Trait-impl symbols render as `<Type as Trait>::method`. They are hidden
    /// when `Type` is a hidden path, or when `Type` is not a path at all (a
    /// generic parameter, fn pointer, slice, tuple or trait object) and
    /// `Trait` is hidden. Inherent methods of such non-path types, e.g.
    /// `<[T]>::sort`, only come from the standard library and are hidden too.
    /// A user type implementing a standard trait stays visible.
    #[must_use]
    pub fn is_internal(&self, function: &str) -> bool {
        let Some(qualified) = function.strip_prefix('<') else {
            return self.matches(function);
        };
        let (self_ty, trait_path) = split_qualified(qualified);
        let self_ty = strip_indirection(self_ty);
        if self_ty.starts_with('<') {
            return self.is_internal(self_ty);
        }
        if self.matches(self_ty) {
            return true;
        }
        if is_path(self_ty) {
            return false;
        }
        trait_path.map_or(true, |trait_path| self.matches(strip_indirection(trait_path)))
    }

    fn matches(&self, name: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Split the body of `<Type as Trait>::method` (leading `<` removed) into
/// `Type` and `Trait`. Only an ` as ` outside nested brackets counts.
fn split_qualified(qualified: &str) -> (&str, Option<&str>) {
    let bytes = qualified.as_bytes();
    let mut depth = 0usize;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            // `->` in fn pointer types
            b'-' if bytes.get(i + 1) == Some(&b'>') => i += 1,
            b'>' if depth == 0 => {
                return match split {
                    Some(at) => (&qualified[..at], Some(&qualified[at + 4..i])),
                    None => (&qualified[..i], None),
                };
            }
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && split.is_none() && qualified[i..].starts_with(" as ") => {
                split = Some(i);
            }
            _ => {}
        }
        i += 1;
    }
    (qualified, None)
}

/// Drop leading `&`, `&mut `, `*const `, `*mut ` and `dyn `.
fn strip_indirection(mut ty: &str) -> &str {
    loop {
        let next = ty
            .trim_start_matches(['&', '*'])
            .trim_start_matches("mut ")
            .trim_start_matches("const ")
            .trim_start_matches("dyn ")
            .trim_start();
        if next.len() == ty.len() {
            return ty;
        }
        ty = next;
    }
}

/// `crate::Type` rather than `T`, `fn(..)`, `[T]` or `(A, B)`.
fn is_path(ty: &str) -> bool {
    ty.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && !ty.starts_with("fn(")
        && !ty.starts_with("unsafe ")
        && !ty.starts_with("extern ")
        && ty.contains("::")
}

/// Install the process-wide configuration.
///
/// Only the first successful call takes effect; later calls report
/// [`ConfigError::AlreadyConfigured`].
pub fn configure(config: StackConfig) -> Result<(), ConfigError> {
    config.validate()?;
    INSTALLED
        .set(config)
        .map_err(|_| ConfigError::AlreadyConfigured)?;
    tracing::debug!("errtrail stack configuration installed");
    Ok(())
}

/// The installed configuration, or the defaults when none was installed.
#[must_use]
pub fn current() -> &'static StackConfig {
    static DEFAULT: OnceCell<StackConfig> = OnceCell::new();
    INSTALLED
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(StackConfig::default))
}
