//! # Tagged-union value for sink marshaling.
//!
//! [`Value`] is the one type that crosses the bridge in both directions:
//! every argument appended by an adapter and every answer returned by a
//! sink is a `Value`. The set of tags is closed on purpose - both sides
//! of the bridge agree on it, and the typed accessors on
//! [`CallbackInvoker`](crate::CallbackInvoker) fall back to a
//! documented default whenever the sink answers with the wrong tag.

use std::collections::BTreeMap;

/// A marshaled value exchanged with the sink.
///
/// Containers (`Map`, `List`) nest arbitrarily. `None` stands for an
/// intentionally absent value, not for a failure.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// UTF-8 string.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Interned symbolic name (kept distinct from `Str` on the wire).
    Symbol(String),
    /// String-keyed map.
    Map(BTreeMap<String, Value>),
    /// Ordered list.
    List(Vec<Value>),
    /// Absent value.
    None,
}

impl Value {
    /// Returns a stable tag name, used in type-mismatch logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Symbol(_) => "symbol",
            Value::Map(_) => "map",
            Value::List(_) => "list",
            Value::None => "none",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_tag() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(7).as_int(), Some(7));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::Symbol("retry".into()).as_symbol(), Some("retry"));
        assert!(Value::None.is_none());
    }

    #[test]
    fn test_wrong_tag_yields_none() {
        assert_eq!(Value::from(7).as_str(), None);
        assert_eq!(Value::from("7").as_int(), None);
        assert_eq!(Value::Str("retry".into()).as_symbol(), None, "str is not a symbol");
    }

    #[test]
    fn test_tag_labels_are_stable() {
        assert_eq!(Value::from("x").tag(), "str");
        assert_eq!(Value::Map(BTreeMap::new()).tag(), "map");
        assert_eq!(Value::List(vec![]).tag(), "list");
        assert_eq!(Value::None.tag(), "none");
    }
}
