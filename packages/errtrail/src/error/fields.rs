//! Context field values and chain-wide field merging

use super::Error;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

/// Field map attached to a single link
pub type Fields = BTreeMap<String, FieldValue>;

/// A context value. Text renderings use its `Display` form; serialization
/// emits the bare value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text
    Str(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Any other value, rendered when it was attached
    Display(String),
}

impl FieldValue {
    /// Capture an arbitrary displayable value by rendering it now.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Display(value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Display(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! field_value_from {
    ($variant:ident: $target:ty => $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

field_value_from!(Int: i64 => i8, i16, i32, i64);
field_value_from!(UInt: u64 => u8, u16, u32, u64);
field_value_from!(Float: f64 => f32, f64);

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

/// Insert into a lazily created map. Empty keys are ignored with a warning.
pub(crate) fn insert_field(fields: &mut Option<Fields>, key: String, value: FieldValue) {
    if key.is_empty() {
        tracing::warn!(%value, "ignoring context field with empty key");
        return;
    }
    fields.get_or_insert_with(Fields::new).insert(key, value);
}

/// Merge the fields of every native link reachable from `error`.
///
/// When a key appears at several depths the outermost value wins. Foreign
/// links contribute nothing but do not stop the walk. Returns `None` when no
/// link carries fields.
#[must_use]
pub fn merged_fields(error: &(dyn StdError + 'static)) -> Option<Fields> {
    let mut collected: Vec<&Fields> = Vec::new();
    let mut next = Some(error);
    while let Some(link) = next {
        if let Some(fields) = link
            .downcast_ref::<Error>()
            .and_then(Error::fields)
            .filter(|fields| !fields.is_empty())
        {
            collected.push(fields);
        }
        next = link.source();
    }

    if collected.is_empty() {
        return None;
    }

    let mut merged = Fields::new();
    for fields in collected.into_iter().rev() {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Some(merged)
}

/// Merged fields as key/value pairs in key order, ready for structured loggers.
#[must_use]
pub fn merged_field_pairs(error: &(dyn StdError + 'static)) -> Vec<(String, FieldValue)> {
    merged_fields(error)
        .map(|fields| fields.into_iter().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_rendering() {
        assert_eq!(FieldValue::from("v").to_string(), "v");
        assert_eq!(FieldValue::from(-3).to_string(), "-3");
        assert_eq!(FieldValue::from(7_u16).to_string(), "7");
        assert_eq!(FieldValue::from(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(
            FieldValue::display(std::net::Ipv4Addr::LOCALHOST).to_string(),
            "127.0.0.1"
        );
    }

    #[test]
    fn test_field_values_serialize_bare() {
        let fields = Fields::from([
            ("count".to_string(), FieldValue::from(3_u8)),
            ("host".to_string(), FieldValue::display(std::net::Ipv4Addr::LOCALHOST)),
            ("retry".to_string(), FieldValue::from(false)),
        ]);
        assert_eq!(
            serde_json::to_string(&fields).expect("fields serialize"),
            r#"{"count":3,"host":"127.0.0.1","retry":false}"#
        );
    }

    #[test]
    fn test_outer_field_shadows_inner() {
        let inner = Error::new("x").with_field("k", "inner");
        let outer = Error::wrap(inner, "y").with_field("k", "outer");

        let fields = merged_fields(&outer).expect("fields should be present");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("k"), Some(&FieldValue::from("outer")));
    }

    #[test]
    fn test_fields_merge_across_depths() {
        let deep = Error::new("deep error")
            .with_field("deep.key1", "value1")
            .with_field("deep.key2", "should be overwritten");
        let err = Error::wrap(deep, "some error")
            .with_field("deep.key2", "value2")
            .with_field("key1", "value1");

        let expected = Fields::from([
            ("deep.key1".to_string(), FieldValue::from("value1")),
            ("deep.key2".to_string(), FieldValue::from("value2")),
            ("key1".to_string(), FieldValue::from("value1")),
        ]);
        assert_eq!(merged_fields(&err), Some(expected));
    }

    #[test]
    fn test_no_fields_anywhere_is_none() {
        let err = Error::wrap(Error::new("inner"), "outer");
        assert_eq!(merged_fields(&err), None);
        assert!(merged_field_pairs(&err).is_empty());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "foreign");
        assert_eq!(merged_fields(&io), None);
    }

    #[test]
    fn test_walk_continues_past_foreign_links() {
        #[derive(Debug)]
        struct Foreign(Error);

        impl fmt::Display for Foreign {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "foreign: {}", self.0)
            }
        }

        impl StdError for Foreign {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err = Error::wrap(Foreign(Error::new("inner").with_field("k", "v")), "outer");
        assert_eq!(
            merged_field_pairs(&err),
            vec![("k".to_string(), FieldValue::from("v"))]
        );
    }
}
