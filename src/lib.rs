//! Path-based access to nested maps and sequences.
//!
//! A [`Handle`] binds a shared [`Tree`] to one path and reads, writes, maps,
//! filters and folds the value there. Paths containing `*` select a
//! [`MultiHandle`] that fans every operation out over all matches in document
//! order.
//!
//! ```
//! use pathdict::{Handle, Number, Value};
//!
//! let mut handle = Handle::from_value(Value::from(serde_json::json!({
//!     "users": {"1": {"age": 22}, "2": {"age": 49}}
//! }))).unwrap();
//!
//! handle.at("users/*/age").many().map(|age| match age {
//!     Value::Number(n) => Value::from(n.add(Number::Integer(1))),
//!     other => other,
//! }).unwrap();
//!
//! let ages = handle.at("users/*/age").many().gather().unwrap();
//! assert_eq!(ages, vec![Value::from(23), Value::from(50)]);
//! ```

pub mod config;
pub mod document;
pub mod file;
pub mod handle;
pub mod path;

pub use document::{Number, Opaque, OpaqueRef, Tree, Value};
pub use handle::{CopyScope, GatherAs, Handle, Member, MultiHandle, Selection};
pub use path::{PathError, PathExpr, PathInput, PathMode, Result};
