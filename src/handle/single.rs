//! Handle bound to one concrete path.

use super::{kind_of, sum_values, CopyScope, Member, MultiHandle, Selection};
use crate::config::Config;
use crate::document::node::{Number, Value};
use crate::document::tree::Tree;
use crate::path::error::{PathError, Result};
use crate::path::expand::expand;
use crate::path::expr::{PathExpr, PathInput, PathMode, Segment};
use crate::path::navigate;
use tracing::debug;

/// A cursor binding a tree to one wildcard-free path.
///
/// Cloning a handle aliases its tree. Use [`Handle::copy`] or
/// [`Handle::deepcopy`] for an independent tree.
#[derive(Debug, Clone)]
pub struct Handle {
    tree: Tree,
    path: PathExpr,
}

impl Handle {
    /// A handle at the root of a shared tree.
    ///
    /// Mutations through this handle are visible through every other handle
    /// on the same tree.
    pub fn new(tree: &Tree) -> Self {
        Self {
            tree: tree.clone(),
            path: PathExpr::default(),
        }
    }

    /// Like [`Handle::new`], with the separator and mode from `config`.
    pub fn with_config(tree: &Tree, config: &Config) -> Self {
        Self {
            tree: tree.clone(),
            path: config.root_path(),
        }
    }

    /// A handle owning a fresh tree built from `value`.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self {
            tree: Tree::new(value)?,
            path: PathExpr::default(),
        })
    }

    pub(crate) fn positioned(tree: Tree, path: PathExpr) -> Self {
        Self { tree, path }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn path(&self) -> &PathExpr {
        &self.path
    }

    /// Selects `path`, parsed with this handle's separator and mode.
    ///
    /// A concrete path moves this handle. A path with wildcards leaves this
    /// handle where it is and selects a [`MultiHandle`] on the same tree.
    pub fn at(&mut self, path: impl Into<PathInput>) -> Selection<'_> {
        self.at_with(path, None, None)
    }

    /// Like [`Handle::at`], overriding the separator and/or mode for this and
    /// later calls.
    pub fn at_with(
        &mut self,
        path: impl Into<PathInput>,
        separator: Option<&str>,
        mode: Option<PathMode>,
    ) -> Selection<'_> {
        let separator = separator.unwrap_or(self.path.separator()).to_string();
        let mode = mode.unwrap_or(self.path.mode());
        let parsed = PathExpr::parse(path, &separator, mode);

        if parsed.has_wildcards() {
            Selection::Many(MultiHandle::new(self.tree.clone(), parsed))
        } else {
            self.path = parsed;
            Selection::One(self)
        }
    }

    pub fn at_root(&mut self) -> &mut Self {
        self.path = self.path.with_segments(Vec::new());
        self
    }

    pub fn at_parent(&mut self) -> &mut Self {
        self.path = self.path.parent();
        self
    }

    /// Every child of the current value.
    pub fn at_children(&self) -> MultiHandle {
        MultiHandle::new(self.tree.clone(), self.path.child(Segment::Wildcard))
    }

    /// Returns the value at the current path.
    ///
    /// A missing map key anywhere on the path gives `Ok(None)`. Descending into
    /// a leaf or addressing a sequence with a bad index is an error.
    pub fn get(&self) -> Result<Option<Value>> {
        let root = self.tree.borrow();
        let value = navigate::resolve(&root, self.path.segments())?.cloned();
        Ok(value)
    }

    /// Like [`Handle::get`], substituting `default` for a missing value.
    pub fn get_or(&self, default: impl Into<Value>) -> Result<Value> {
        Ok(self.get()?.unwrap_or_else(|| default.into()))
    }

    /// Returns true if `path` (from the root) leads to a non-null value.
    ///
    /// Wildcard paths are contained when any match is. Malformed paths are
    /// simply not contained. The handle does not move.
    pub fn contains(&self, path: impl Into<PathInput>) -> bool {
        let path = PathExpr::parse(path, self.path.separator(), self.path.mode());
        let root = self.tree.borrow();
        let Ok(paths) = expand(&path, &root) else {
            return false;
        };
        let found = paths.iter().any(|p| {
            matches!(navigate::resolve(&root, p.segments()), Ok(Some(v)) if !v.is_null())
        });
        found
    }

    /// Writes `value` at the current path, creating missing intermediate maps.
    ///
    /// Setting `Value::Null` is a no-op. At the root, a map can only replace a
    /// map and a sequence a sequence; the root container keeps its identity.
    /// Sequences are never grown.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        if value.is_null() {
            return Ok(self);
        }

        let mut root = self.tree.borrow_mut();
        if self.path.is_empty() {
            let same_kind = matches!(
                (&*root, &value),
                (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
            );
            if !same_kind {
                return Err(PathError::type_mismatch("set at root", root.kind(), value.kind()));
            }
            debug!(kind = value.kind(), "replacing root content");
            *root = value;
        } else {
            navigate::assign(&mut root, self.path.segments(), value)?;
        }
        drop(root);

        Ok(self)
    }

    /// Replaces the current value with `f(current)`. A missing value is passed
    /// as `Value::Null`.
    pub fn map<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(Value) -> Value,
    {
        let current = self.get()?.unwrap_or_default();
        self.set(f(current))
    }

    /// Copy-on-write [`Handle::map`]: maps a copy of the whole tree and returns
    /// a handle on it, positioned at the same path.
    pub fn mapped<F>(&self, f: F) -> Result<Handle>
    where
        F: FnOnce(Value) -> Value,
    {
        let mut copy = self.duplicate(CopyScope::Root, false)?;
        copy.path = self.path.clone();
        copy.map(f)?;
        Ok(copy)
    }

    /// Keeps only the children of the current map or sequence for which
    /// `predicate` returns true, writing the result back in place.
    pub fn filter<F>(&mut self, mut predicate: F) -> Result<&mut Self>
    where
        F: FnMut(Member<'_>) -> bool,
    {
        let filtered = match self.get()? {
            Some(Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter(|(key, value)| predicate(Member::Entry { key, value }))
                    .collect(),
            ),
            Some(Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .filter(|value| predicate(Member::Element(value)))
                    .collect(),
            ),
            other => {
                return Err(PathError::type_mismatch(
                    "filter",
                    "a map or sequence",
                    kind_of(&other),
                ))
            }
        };
        self.set(filtered)
    }

    /// Copy-on-write [`Handle::filter`]: filters a copy of the current value
    /// and returns a handle rooted at that copy.
    pub fn filtered<F>(&self, predicate: F) -> Result<Handle>
    where
        F: FnMut(Member<'_>) -> bool,
    {
        let current = self.get()?;
        if !current.as_ref().is_some_and(Value::is_container) {
            return Err(PathError::type_mismatch(
                "filter",
                "a map or sequence",
                kind_of(&current),
            ));
        }

        let mut copy = self.duplicate(CopyScope::Current, false)?;
        copy.filter(predicate)?;
        Ok(copy)
    }

    /// Folds the children of the current map or sequence in document order.
    pub fn reduce<A, F>(&self, mut f: F, seed: A) -> Result<A>
    where
        F: FnMut(Member<'_>, A) -> A,
    {
        match self.get()? {
            Some(Value::Object(map)) => Ok(map
                .iter()
                .fold(seed, |acc, (key, value)| f(Member::Entry { key, value }, acc))),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .fold(seed, |acc, value| f(Member::Element(value), acc))),
            other => Err(PathError::type_mismatch(
                "reduce",
                "a map or sequence",
                kind_of(&other),
            )),
        }
    }

    /// Sums the map values or sequence elements at the current path.
    pub fn sum(&self) -> Result<Number> {
        match self.get()? {
            Some(Value::Object(map)) => sum_values(map.values()),
            Some(Value::Array(items)) => sum_values(&items),
            other => Err(PathError::type_mismatch(
                "sum",
                "a map or sequence",
                kind_of(&other),
            )),
        }
    }

    /// Appends to the sequence at the current path. A missing or null value
    /// becomes a one-element sequence.
    pub fn append(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        let items = match self.get()? {
            None | Some(Value::Null) => vec![value.into()],
            Some(Value::Array(mut items)) => {
                items.push(value.into());
                items
            }
            Some(other) => {
                return Err(PathError::type_mismatch("append", "a sequence", other.kind()))
            }
        };
        self.set(Value::Array(items))
    }

    /// Shallow-merges `other` into the map at the current path.
    pub fn update(&mut self, other: impl Into<Value>) -> Result<&mut Self> {
        let patch = match other.into() {
            Value::Object(patch) => patch,
            other => {
                return Err(PathError::invalid_argument(format!(
                    "update expects a map, got {}",
                    other.kind()
                )))
            }
        };
        match self.get()? {
            Some(Value::Object(mut map)) => {
                map.extend(patch);
                self.set(Value::Object(map))
            }
            other => Err(PathError::type_mismatch("update", "a map", kind_of(&other))),
        }
    }

    /// Keys of the map at the current path.
    pub fn keys(&self) -> Result<Vec<String>> {
        match self.get()? {
            Some(Value::Object(map)) => Ok(map.into_keys().collect()),
            other => Err(PathError::type_mismatch("keys", "a map", kind_of(&other))),
        }
    }

    /// Values of the map, or elements of the sequence, at the current path.
    pub fn values(&self) -> Result<Vec<Value>> {
        match self.get()? {
            Some(Value::Object(map)) => Ok(map.into_values().collect()),
            Some(Value::Array(items)) => Ok(items),
            other => Err(PathError::type_mismatch(
                "values",
                "a map or sequence",
                kind_of(&other),
            )),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let root = self.tree.borrow();
        let len = match navigate::resolve(&root, self.path.segments())? {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            other => {
                let found = other.map(Value::kind).unwrap_or("nothing");
                return Err(PathError::type_mismatch("len", "a map or sequence", found));
            }
        };
        Ok(len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Copies the current value (or the whole root) into a new tree.
    ///
    /// Children are owned values, so every nested map and sequence is
    /// duplicated and this copy never shares containers with the source. Only
    /// opaque leaves are shared with the original. The new handle is at the
    /// root of the copy and keeps this handle's separator and mode.
    pub fn copy(&self, scope: CopyScope) -> Result<Handle> {
        self.duplicate(scope, false)
    }

    /// Like [`Handle::copy`], but opaque leaves are asked to copy themselves.
    pub fn deepcopy(&self, scope: CopyScope) -> Result<Handle> {
        self.duplicate(scope, true)
    }

    fn duplicate(&self, scope: CopyScope, deep: bool) -> Result<Handle> {
        let root = self.tree.borrow();
        let source = match scope {
            CopyScope::Root => Some(&*root),
            CopyScope::Current => navigate::resolve(&root, self.path.segments())?,
        };
        let Some(source) = source else {
            return Err(PathError::invalid_argument(format!(
                "nothing to copy at '{}'",
                self.path
            )));
        };

        let copy = if deep {
            source.deep_clone()
        } else {
            source.clone()
        };

        Ok(Handle {
            tree: Tree::new(copy)?,
            path: self.path.with_segments(Vec::new()),
        })
    }
}
