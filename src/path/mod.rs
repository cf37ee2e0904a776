//! Path expressions, traversal and wildcard expansion.
//!
//! # Path syntax
//!
//! - `a/b/c` - keys separated by the separator (default `/`)
//! - `["a", "b", "c"]` - the same path as a list
//! - `2` - a single scalar key
//! - `users/*/age` - `*` selects every key or index at that level
//!
//! In [`PathMode::Literal`] nothing is split and `*` is an ordinary key.

pub mod error;
pub mod expand;
pub mod expr;
pub mod navigate;

pub use error::{PathError, Result};
pub use expand::expand;
pub use expr::{Part, PathExpr, PathInput, PathMode, Segment, DEFAULT_SEPARATOR, WILDCARD};
