//! Raw stack capture and lazy symbol resolution

use super::Frame;
use crate::config;
use std::fmt;

/// Upper bound on the number of caller addresses kept per stack, counted from
/// the first address outside the hidden frames
pub const MAX_STACK_DEPTH: usize = 64;

/// Room for the walker, [`Stack::capture`] and the constructor above it, which
/// are recorded along with the caller's frames and dropped on resolution.
const CAPTURE_OVERHEAD: usize = 16;

const MAX_RECORDED: usize = MAX_STACK_DEPTH + CAPTURE_OVERHEAD;

/// Instruction addresses captured when an error was created.
///
/// Capturing only walks the stack; turning addresses into [`Frame`]s happens
/// in [`Stack::resolve`], which is much more expensive and is only invoked
/// when a chain is actually requested.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stack {
    ips: Vec<usize>,
}

impl Stack {
    /// Record the return addresses of the current thread.
    ///
    /// Frames of the walker and of this crate are kept here and dropped on
    /// resolution by the configured internal-prefix filter, so the recording
    /// reaches [`MAX_STACK_DEPTH`] addresses past them.
    #[must_use]
    pub fn capture() -> Self {
        Self { ips: walk() }
    }

    /// A stack that resolves to no frames
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap addresses recorded elsewhere, e.g. by a foreign error type.
    #[must_use]
    pub fn from_ips(ips: impl IntoIterator<Item = usize>) -> Self {
        Self {
            ips: ips.into_iter().take(MAX_RECORDED).collect(),
        }
    }

    /// Reuse the addresses of a trace captured with the `backtrace` crate.
    #[cfg(feature = "full-backtrace")]
    #[must_use]
    pub fn from_backtrace(trace: &backtrace::Backtrace) -> Self {
        Self::from_ips(trace.frames().iter().map(|frame| frame.ip() as usize))
    }

    /// Recorded addresses, innermost first
    #[must_use]
    pub fn ips(&self) -> &[usize] {
        &self.ips
    }

    /// Number of recorded addresses
    #[must_use]
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    /// Symbolize the recorded addresses.
    ///
    /// Frames whose function matches the configured internal prefixes are
    /// skipped, as are symbols without a name, file or line. At most
    /// [`MAX_STACK_DEPTH`] addresses are symbolized from the first one that
    /// yields a visible frame. An empty result (stripped binaries, release
    /// builds without debug info) is valid.
    #[must_use]
    pub fn resolve(&self) -> Vec<Frame> {
        let filter = config::current().filter();
        let mut frames = Vec::new();
        let mut callers = 0;
        for &ip in &self.ips {
            if callers == MAX_STACK_DEPTH {
                break;
            }
            let before = frames.len();
            frames.extend(
                symbolize(ip)
                    .into_iter()
                    .filter(|frame| !filter.is_internal(frame.function())),
            );
            if callers > 0 || frames.len() > before {
                callers += 1;
            }
        }
        if frames.is_empty() && !self.ips.is_empty() {
            tracing::debug!(
                addresses = self.ips.len(),
                "stack resolved to zero frames"
            );
        }
        frames
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("depth", &self.ips.len())
            .finish()
    }
}

#[cfg(feature = "full-backtrace")]
fn walk() -> Vec<usize> {
    let mut ips = Vec::with_capacity(MAX_RECORDED);
    backtrace::trace(|frame| {
        ips.push(frame.ip() as usize);
        ips.len() < MAX_RECORDED
    });
    ips
}

#[cfg(not(feature = "full-backtrace"))]
fn walk() -> Vec<usize> {
    Vec::new()
}

/// Resolve one address. Inlined calls yield several frames, innermost first.
#[cfg(feature = "full-backtrace")]
fn symbolize(ip: usize) -> Vec<Frame> {
    let mut frames = Vec::new();
    backtrace::resolve(ip as *mut std::ffi::c_void, |symbol| {
        let (Some(name), Some(file), Some(line)) =
            (symbol.name(), symbol.filename(), symbol.lineno())
        else {
            return;
        };
        // `{:#}` drops the trailing `::h0123abcd` hash
        frames.push(Frame::new(
            file.display().to_string(),
            format!("{name:#}"),
            line,
        ));
    });
    frames
}

#[cfg(not(feature = "full-backtrace"))]
fn symbolize(_ip: usize) -> Vec<Frame> {
    Vec::new()
}
