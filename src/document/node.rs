//! Tree value representation.
//!
//! A tree is built from three kinds of nodes: maps (`Value::Object`), sequences
//! (`Value::Array`) and leaves (everything else). Maps keep insertion order so
//! that iteration, wildcard expansion and gathering all follow document order.
//!
//! # Example
//!
//! ```
//! use pathdict::document::node::{Number, Value};
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("name".to_string(), Value::from("pathdict"));
//! map.insert("version".to_string(), Value::Number(Number::Integer(1)));
//! let object = Value::Object(map);
//!
//! assert!(object.is_object());
//! assert_eq!(object.kind(), "map");
//! ```

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A foreign object stored as a leaf.
///
/// The engine never looks inside an opaque leaf. Fast clones alias it; a true
/// deep clone asks it for a copy through [`Opaque::deep_clone`].
pub trait Opaque: fmt::Debug + Any {
    fn as_any(&self) -> &dyn Any;

    /// Returns an independent copy, or `None` to keep sharing this instance.
    fn deep_clone(&self) -> Option<Rc<dyn Opaque>> {
        None
    }
}

/// Shared reference to an opaque leaf. Equality is identity.
#[derive(Clone)]
pub struct OpaqueRef(Rc<dyn Opaque>);

impl OpaqueRef {
    pub fn new<T: Opaque>(object: T) -> Self {
        Self(Rc::new(object))
    }

    pub fn from_rc(object: Rc<dyn Opaque>) -> Self {
        Self(object)
    }

    pub fn get(&self) -> &dyn Opaque {
        self.0.as_ref()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &OpaqueRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    fn deep_clone(&self) -> Self {
        match self.0.deep_clone() {
            Some(copy) => Self(copy),
            None => self.clone(),
        }
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl PartialEq for OpaqueRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Numeric leaf (integer or float).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Adds two numbers. Integers stay integers until they overflow or meet a float.
    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_add(b) {
                Some(sum) => Number::Integer(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Map node, keys unique, insertion ordered
    Object(IndexMap<String, Value>),
    /// Sequence node addressed by integer index
    Array(Vec<Value>),
    String(String),
    Number(Number),
    Boolean(bool),
    #[default]
    Null,
    /// A foreign object, cloned by reference unless it can deep-clone itself
    Opaque(OpaqueRef),
}

impl Value {
    /// Returns an empty map node.
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    /// Returns true if this value is a map node.
    ///
    /// # Example
    ///
    /// ```
    /// use pathdict::document::node::Value;
    ///
    /// assert!(Value::object().is_object());
    /// assert!(!Value::from(42).is_object());
    /// ```
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true for map and sequence nodes.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short human name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Object(_) => "map",
            Value::Array(_) => "sequence",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::Opaque(_) => "opaque object",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Recursively copies containers and asks opaque leaves to copy themselves.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.deep_clone()))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(Value::deep_clone).collect()),
            Value::Opaque(object) => Value::Opaque(object.deep_clone()),
            other => other.clone(),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Integer(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(Number::Integer(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<OpaqueRef> for Value {
    fn from(object: OpaqueRef) -> Self {
        Value::Opaque(object)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Integer(i)),
                None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Boolean(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Integer(i)),
                None => Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Value::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// Map keys are strings; YAML allows any scalar (or worse) as a key.
fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_unit(),
            Value::Opaque(object) => serializer.serialize_str(&format!("{:?}", object)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Handmade(u32);

    impl Opaque for Handmade {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Copyable(u32);

    impl Opaque for Copyable {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn deep_clone(&self) -> Option<Rc<dyn Opaque>> {
            Some(Rc::new(Copyable(self.0)))
        }
    }

    #[test]
    fn test_from_json_keeps_order() {
        let value = Value::from(json!({"b": 1, "a": [true, null, 2.5], "c": "x"}));
        let map = value.as_object().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(
            map["a"],
            Value::Array(vec![Value::Boolean(true), Value::Null, Value::from(2.5)])
        );
    }

    #[test]
    fn test_from_yaml_stringifies_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: x\n").unwrap();
        let value = Value::from(yaml);
        let map = value.as_object().unwrap();
        assert_eq!(map["1"], Value::from("one"));
        assert!(map.contains_key("true"));
        assert_eq!(map["name"], Value::from("x"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::object().kind(), "map");
        assert_eq!(Value::Array(vec![]).kind(), "sequence");
        assert_eq!(Value::from(1).kind(), "number");
        assert_eq!(Value::Null.kind(), "null");
    }

    #[test]
    fn test_number_add() {
        assert_eq!(
            Number::Integer(2).add(Number::Integer(3)),
            Number::Integer(5)
        );
        assert_eq!(Number::Integer(2).add(Number::Float(0.5)), Number::Float(2.5));
        assert!(!Number::Integer(i64::MAX)
            .add(Number::Integer(1))
            .is_integer());
    }

    #[test]
    fn test_fast_clone_aliases_opaque() {
        let original = Value::Array(vec![Value::Opaque(OpaqueRef::new(Handmade(7)))]);
        let copy = original.clone();
        match (&original, &copy) {
            (Value::Array(a), Value::Array(b)) => match (&a[0], &b[0]) {
                (Value::Opaque(x), Value::Opaque(y)) => assert!(x.ptr_eq(y)),
                _ => panic!("expected opaque leaves"),
            },
            _ => panic!("expected arrays"),
        }
    }

    #[test]
    fn test_deep_clone_copies_capable_opaque() {
        let original = Value::Opaque(OpaqueRef::new(Copyable(3)));
        let copy = original.deep_clone();
        assert_ne!(original, copy);
        if let Value::Opaque(object) = &copy {
            assert_eq!(object.downcast_ref::<Copyable>().unwrap().0, 3);
        }

        let plain = Value::Opaque(OpaqueRef::new(Handmade(1)));
        assert_eq!(plain, plain.deep_clone());
    }

    #[test]
    fn test_serialize_to_json() {
        let value = Value::from(json!({"a": [1, 2.5, "s", null, false]}));
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"a":[1,2.5,"s",null,false]}"#);
    }
}
