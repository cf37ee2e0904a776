//! Cursors over a tree: [`Handle`] for one concrete path, [`MultiHandle`] for
//! a wildcard path fanned out across every match.
//!
//! # Example
//!
//! ```
//! use pathdict::document::{Tree, Value};
//! use pathdict::handle::Handle;
//!
//! let tree = Tree::new(Value::from(serde_json::json!({
//!     "users": {"1": {"age": 22}, "2": {"age": 49}}
//! }))).unwrap();
//! let mut handle = Handle::new(&tree);
//!
//! let ages = handle.at("users/*/age").many().gather().unwrap();
//! assert_eq!(ages, vec![Value::from(22), Value::from(49)]);
//!
//! handle.at("users/1/age").one().unwrap().set(23).unwrap();
//! assert_eq!(handle.get().unwrap(), Some(Value::from(23)));
//! ```

mod multi;
mod single;

pub use multi::MultiHandle;
pub use single::Handle;

use crate::document::node::{Number, Value};
use crate::path::error::{PathError, Result};
use std::str::FromStr;

/// One child handed to filter and reduce callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    /// A map entry
    Entry { key: &'a str, value: &'a Value },
    /// A sequence element
    Element(&'a Value),
}

impl<'a> Member<'a> {
    /// The map key, or `None` for sequence elements.
    pub fn key(&self) -> Option<&'a str> {
        match *self {
            Member::Entry { key, .. } => Some(key),
            Member::Element(_) => None,
        }
    }

    pub fn value(&self) -> &'a Value {
        match *self {
            Member::Entry { value, .. } => value,
            Member::Element(value) => value,
        }
    }
}

/// What `at` selected: the handle itself, or a fan-out over a wildcard path.
#[derive(Debug)]
pub enum Selection<'h> {
    One(&'h mut Handle),
    Many(MultiHandle),
}

impl<'h> Selection<'h> {
    /// The positioned handle. Fails if the path contained wildcards.
    pub fn one(self) -> Result<&'h mut Handle> {
        match self {
            Selection::One(handle) => Ok(handle),
            Selection::Many(multi) => Err(PathError::invalid_argument(format!(
                "path '{}' contains wildcards",
                multi.path()
            ))),
        }
    }

    /// A multi-handle over the selection. A concrete path fans out to itself.
    pub fn many(self) -> MultiHandle {
        match self {
            Selection::One(handle) => MultiHandle::new(handle.tree().clone(), handle.path().clone()),
            Selection::Many(multi) => multi,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Selection::Many(_))
    }
}

/// Which part of the tree a copy starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyScope {
    /// The value at the handle's current path
    #[default]
    Current,
    /// The whole root
    Root,
}

/// Shape of gathered multi-handle results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatherAs {
    /// A sequence in expansion order
    #[default]
    List,
    /// A map keyed by the concrete path's keys, written as a JSON array
    Map,
}

impl FromStr for GatherAs {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(GatherAs::List),
            "map" | "dict" => Ok(GatherAs::Map),
            other => Err(PathError::invalid_argument(format!(
                "can only gather as list or map, not '{}'",
                other
            ))),
        }
    }
}

/// Sums numeric leaves; anything else is a type mismatch.
pub(crate) fn sum_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<Number> {
    values
        .into_iter()
        .try_fold(Number::Integer(0), |total, value| match value {
            Value::Number(n) => Ok(total.add(*n)),
            other => Err(PathError::type_mismatch("sum", "numbers", other.kind())),
        })
}

/// Kind name of a possibly absent value.
pub(crate) fn kind_of(value: &Option<Value>) -> &'static str {
    value.as_ref().map(Value::kind).unwrap_or("nothing")
}
