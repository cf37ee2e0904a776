//! The shared root of a tree.
//!
//! A `Tree` is a cheap, clonable reference to one root value. Cloning a
//! `Tree` does not copy data: both clones see every mutation. Independent
//! copies are made explicitly through the handle copy operations.
//!
//! # Example
//!
//! ```
//! use pathdict::document::tree::Tree;
//! use pathdict::document::node::Value;
//!
//! let tree = Tree::new(Value::from(serde_json::json!({"a": 1}))).unwrap();
//! let alias = tree.clone();
//! assert!(tree.ptr_eq(&alias));
//! assert!(Tree::new(Value::from(1)).is_err());
//! ```

use super::node::Value;
use crate::path::error::{PathError, Result};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Reference-counted root holding a map or sequence.
#[derive(Debug, Clone)]
pub struct Tree {
    root: Rc<RefCell<Value>>,
}

impl Tree {
    /// Wraps `root` in a new tree.
    ///
    /// Fails with [`PathError::InvalidArgument`] unless the root is a map or
    /// a sequence.
    pub fn new(root: Value) -> Result<Self> {
        if !root.is_container() {
            return Err(PathError::invalid_argument(format!(
                "tree root must be a map or sequence, not {}",
                root.kind()
            )));
        }
        Ok(Self {
            root: Rc::new(RefCell::new(root)),
        })
    }

    /// Returns true if both trees share the same root.
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }

    /// Borrows the root immutably.
    ///
    /// The borrow must be released before any mutating handle operation runs
    /// on an alias of this tree.
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.root.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.root.borrow_mut()
    }

    /// Returns a copy of the whole tree (opaque leaves aliased).
    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }

    /// Number of live references to the root.
    pub fn alias_count(&self) -> usize {
        Rc::strong_count(&self.root)
    }
}
