//! Construction, rendering, fields and call-site capture of native errors

mod common;

use common::{assert_called_from, io, setup};
use errtrail::{merged_fields, stack_chain, Error, FieldValue, Fields};
use std::error::Error as StdError;
use std::fmt;

const FILE: &str = "error_test.rs";

fn deep_error() -> (Error, u32) {
    let (err, line) = (Error::new("deep error"), line!());
    let err = err
        .with_field("deep.key1", "value1")
        .with_field("deep.key2", "should be overwritten");
    (err, line)
}

#[derive(Debug)]
struct Annotated(Error);

impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotated: {}", self.0)
    }
}

impl StdError for Annotated {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

#[test]
fn test_rendered_messages() {
    setup();
    let cases: Vec<(&str, Error, &str)> = vec![
        ("normal error", Error::new("some error"), "some error"),
        (
            "fields are not part of the message",
            Error::new("some error").with_field("k", "v"),
            "some error",
        ),
        (
            "wraps a foreign error",
            Error::wrap(io("error2"), "error1"),
            "error1: error2",
        ),
        ("no error text", Error::new(""), "error"),
        (
            "wraps nothing",
            Error::wrap_opt(None::<std::io::Error>, "some error"),
            "some error",
        ),
        (
            "empty message with cause",
            Error::wrap(Error::new("inner"), ""),
            "inner",
        ),
        (
            "three levels",
            Error::wrap(Error::wrap(Error::new("a"), "b"), "c"),
            "c: b: a",
        ),
    ];

    for (name, err, expected) in cases {
        assert_eq!(err.to_string(), expected, "case {name}");
    }
}

#[test]
fn test_new_captures_call_site() {
    setup();
    let (err, line) = (Error::new("some error").with_field("key1", "value1"), line!());

    let chain = stack_chain(&err);
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].message(), "some error");
    assert_called_from(chain[0].frames(), FILE, "test_new_captures_call_site", line);
}

#[test]
fn test_wrap_keeps_each_links_own_stack_and_fields() {
    setup();
    let ((inner, deep_line), inner_line) = (deep_error(), line!());
    let (mut err, outer_line) = (Error::wrap(inner, "some error"), line!());
    err.set_field("deep.key2", "value2").set_field("key1", "value1");

    assert_eq!(err.to_string(), "some error: deep error");

    let chain = err.stack_chain();
    assert_eq!(chain.len(), 2);

    assert_eq!(chain[0].message(), "some error");
    assert_eq!(
        chain[0].fields(),
        Some(&Fields::from([
            ("deep.key2".to_string(), FieldValue::from("value2")),
            ("key1".to_string(), FieldValue::from("value1")),
        ]))
    );
    assert_called_from(
        chain[0].frames(),
        FILE,
        "test_wrap_keeps_each_links_own_stack_and_fields",
        outer_line,
    );

    assert_eq!(chain[1].message(), "deep error");
    assert_eq!(
        chain[1].fields(),
        Some(&Fields::from([
            ("deep.key1".to_string(), FieldValue::from("value1")),
            ("deep.key2".to_string(), FieldValue::from("should be overwritten")),
        ]))
    );
    // the inner link was built in deep_error, called from this test
    assert_called_from(chain[1].frames(), FILE, "deep_error", deep_line);
    assert!(chain[1]
        .frames()
        .iter()
        .any(|frame| frame.function().ends_with("test_wrap_keeps_each_links_own_stack_and_fields")
            && frame.line() == inner_line));

    let expected = Fields::from([
        ("deep.key1".to_string(), FieldValue::from("value1")),
        ("deep.key2".to_string(), FieldValue::from("value2")),
        ("key1".to_string(), FieldValue::from("value1")),
    ]);
    assert_eq!(err.merged_fields(), Some(expected));
}

#[test]
fn test_merged_fields_cases() {
    setup();
    assert_eq!(merged_fields(&io("some error")), None);
    assert_eq!(merged_fields(&Error::new("some error")), None);
    assert_eq!(
        merged_fields(&Error::new("").with_field("k", "v")),
        Some(Fields::from([("k".to_string(), FieldValue::from("v"))]))
    );
    assert_eq!(
        merged_fields(&Annotated(Error::new("some error").with_field("k", "v"))),
        Some(Fields::from([("k".to_string(), FieldValue::from("v"))]))
    );
}

#[test]
fn test_field_shadowing() {
    setup();
    let err = Error::wrap(Error::new("x").with_field("k", "inner"), "y").with_field("k", "outer");
    assert_eq!(
        err.merged_fields(),
        Some(Fields::from([("k".to_string(), FieldValue::from("outer"))]))
    );
}

#[test]
fn test_set_field_overwrites_and_ignores_empty_keys() {
    setup();
    let mut err = Error::new("x");
    err.set_field("k", 1).set_field("k", 2).set_field("", "dropped");

    assert_eq!(
        err.fields(),
        Some(&Fields::from([("k".to_string(), FieldValue::from(2))]))
    );
}

#[test]
fn test_source_is_single_level() {
    setup();
    let root = io("error1");
    let err = Error::wrap(Error::wrap(root, "error2"), "error3");

    let source = err.source().expect("cause should be present");
    assert_eq!(source.to_string(), "error2: error1");
    assert!(source.downcast_ref::<Error>().is_some());
    assert!(err.cause().is_some());

    let unwrapped = Error::wrap_opt(None::<Error>, "error2");
    assert!(unwrapped.source().is_none());
    assert!(unwrapped.cause().is_none());
    assert_eq!(stack_chain(&unwrapped).len(), 1);
}

#[test]
fn test_host_chain_search_finds_foreign_cause() {
    setup();
    let err = Error::wrap(
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset"),
        "sync failed",
    );

    let found = std::iter::successors(Some(&err as &(dyn StdError + 'static)), |&e| e.source())
        .find_map(|e| e.downcast_ref::<std::io::Error>())
        .map(std::io::Error::kind);
    assert_eq!(found, Some(std::io::ErrorKind::ConnectionReset));

    let missing = std::iter::successors(Some(&err as &(dyn StdError + 'static)), |&e| e.source())
        .any(|e| e.downcast_ref::<fmt::Error>().is_some());
    assert!(!missing);
}

#[test]
fn test_chain_is_pure_and_bounded() {
    setup();
    let err = Error::wrap(Annotated(Error::wrap(io("root"), "middle")), "head");

    let first = stack_chain(&err);
    let second = stack_chain(&err);
    assert_eq!(first, second);
    assert!(first.len() <= 4);
    assert!(std::ptr::eq(
        first[0].error() as *const dyn StdError as *const (),
        &err as *const Error as *const (),
    ));

    // the annotated wrapper bakes its cause's text into its own message
    let messages: Vec<&str> = first.iter().map(|r| r.message()).collect();
    assert_eq!(messages, ["head", "annotated", "middle", "root"]);
}

#[test]
fn test_native_chain_never_collapses() {
    setup();
    let err = Error::wrap(Error::wrap(Error::new("same"), "same"), "same");
    let chain = err.stack_chain();
    assert_eq!(chain.len(), 3);
    assert!(chain.iter().all(|record| record.message() == "same"));
}
