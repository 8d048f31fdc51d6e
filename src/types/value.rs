use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parse::parse_list;

/// A condition parameter as stored in the rule document.
///
/// The editor writes whatever its form controls produce, so the accessors
/// below are lenient: a number field may arrive as a string, a list field as
/// a comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of strings (roles, term slugs).
    List(Vec<String>),
}

impl Value {
    /// Interpret as an integer. Integral floats and numeric strings are
    /// accepted; an empty string (a cleared number field) is not.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret as a non-empty string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Interpret as a list of strings. A plain string is split on commas.
    #[must_use]
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::String(s) => Some(parse_list(s)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl From<&[&str]> for Value {
    fn from(v: &[&str]) -> Self {
        Value::List(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(v: [&str; N]) -> Self {
        Value::List(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::List(v) => write!(f, "[{}]", v.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_conversions() {
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
        assert_eq!(
            Value::from(["a", "b"]),
            Value::List(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("hello".into()).to_string(), "\"hello\"");
        assert_eq!(Value::from(["a", "b"]).to_string(), "[a, b]");
    }

    #[test]
    fn as_i64_lenient() {
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::Float(7.0).as_i64(), Some(7));
        assert_eq!(Value::Float(7.5).as_i64(), None);
        assert_eq!(Value::String(" 42 ".into()).as_i64(), Some(42));
        assert_eq!(Value::String(String::new()).as_i64(), None);
        assert_eq!(Value::Bool(true).as_i64(), None);
    }

    #[test]
    fn as_str_rejects_empty() {
        assert_eq!(Value::String("about".into()).as_str(), Some("about"));
        assert_eq!(Value::String(String::new()).as_str(), None);
        assert_eq!(Value::Int(1).as_str(), None);
    }

    #[test]
    fn as_list_splits_legacy_strings() {
        assert_eq!(
            Value::String("editor, author".into()).as_list(),
            Some(vec!["editor".to_owned(), "author".to_owned()])
        );
        assert_eq!(Value::Int(3).as_list(), None);
    }

    #[test]
    fn deserialize_untagged() {
        let v: Vec<Value> = serde_json::from_str(r#"[1, 2.5, true, "x", ["a", "b"]]"#).unwrap();
        assert_eq!(
            v,
            vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Bool(true),
                Value::String("x".into()),
                Value::from(["a", "b"]),
            ]
        );
    }
}
