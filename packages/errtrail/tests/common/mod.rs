//! Shared helpers for integration tests
#![allow(dead_code)]

use errtrail::Frame;
use std::sync::Once;

static SETUP: Once = Once::new();

/// Register the foreign stack adapters used by the tests.
pub fn setup() {
    SETUP.call_once(|| {
        errtrail::LoggingTransformer::init_test();
        errtrail::register_tracer::<pkgerrors::WithStack>();
    });
}

pub fn io(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message.to_string())
}

/// Frames joined the way the verbose rendering joins them
pub fn render_frames(frames: &[Frame]) -> String {
    frames
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The innermost visible frame must be `function` in `file` at `line`.
pub fn assert_called_from(frames: &[Frame], file: &str, function: &str, line: u32) {
    let first = frames
        .first()
        .unwrap_or_else(|| panic!("expected frames for {function}, got none"));
    assert!(
        first.function().ends_with(function),
        "expected frame in {function}, got {}",
        first.function()
    );
    assert!(
        first.file().ends_with(file),
        "expected frame in {file}, got {}",
        first.file()
    );
    assert_eq!(first.line(), line, "line of {}", first.function());
}

/// A small foreign error library that wraps the way Go's pkg/errors does:
/// one link carries the combined message, a second link on top of it carries
/// the stack and repeats the same text.
pub mod pkgerrors {
    use errtrail::{BoxError, Frame, Stack, StackTracer};

    #[derive(Debug, thiserror::Error)]
    #[error("{message}: {source}")]
    pub struct WithMessage {
        message: String,
        source: BoxError,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("{source}")]
    pub struct WithStack {
        source: WithMessage,
        stack: Stack,
    }

    impl StackTracer for WithStack {
        fn stack_trace(&self) -> Vec<Frame> {
            self.stack
                .resolve()
                .into_iter()
                .filter(|frame| !frame.function().contains("::pkgerrors::"))
                .collect()
        }
    }

    pub fn wrap(cause: impl Into<BoxError>, message: &str) -> WithStack {
        WithStack {
            source: WithMessage {
                message: message.to_string(),
                source: cause.into(),
            },
            stack: Stack::capture(),
        }
    }
}
