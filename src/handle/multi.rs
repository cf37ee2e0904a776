//! Fan-out over every concrete path matching a wildcard path.

use super::{sum_values, GatherAs, Handle, Member};
use crate::document::node::{Number, Value};
use crate::document::tree::Tree;
use crate::path::error::{PathError, Result};
use crate::path::expand::expand;
use crate::path::expr::PathExpr;
use crate::path::navigate;
use indexmap::IndexMap;

/// A wildcard path bound to a tree.
///
/// Nothing is cached: every call expands the path against the tree as it is
/// at that moment, so each call costs one expansion walk.
#[derive(Debug, Clone)]
pub struct MultiHandle {
    tree: Tree,
    path: PathExpr,
}

impl MultiHandle {
    pub(crate) fn new(tree: Tree, path: PathExpr) -> Self {
        Self { tree, path }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The unexpanded path.
    pub fn path(&self) -> &PathExpr {
        &self.path
    }

    /// The concrete paths matched right now, in document order.
    pub fn paths(&self) -> Result<Vec<PathExpr>> {
        let root = self.tree.borrow();
        let paths = expand(&self.path, &root)?;
        Ok(paths)
    }

    /// Values at every match. Absent values are gathered as `Value::Null`.
    pub fn gather(&self) -> Result<Vec<Value>> {
        Ok(self
            .gather_paths()?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }

    /// Every match paired with its value.
    pub fn gather_paths(&self) -> Result<Vec<(PathExpr, Value)>> {
        let root = self.tree.borrow();
        let mut gathered = Vec::new();
        for path in expand(&self.path, &root)? {
            let value = navigate::resolve(&root, path.segments())?
                .cloned()
                .unwrap_or_default();
            gathered.push((path, value));
        }
        Ok(gathered)
    }

    /// Gathers into one value.
    ///
    /// As a list, the result is a sequence of values, or of `[path, value]`
    /// pairs when `include_paths` is set (the path as a sequence of keys).
    /// As a map, each value is keyed by its path's keys written as a JSON
    /// array (`["users","1","age"]`), so keys containing the separator never
    /// collide; `include_paths` has no effect.
    ///
    /// # Example
    ///
    /// ```
    /// use pathdict::{GatherAs, Handle, Value};
    ///
    /// let mut handle = Handle::from_value(Value::from(serde_json::json!({
    ///     "a/b": {"c": 1},
    ///     "a": {"b/c": 2}
    /// }))).unwrap();
    /// let gathered = handle.at("*/*").many().gather_as(GatherAs::Map, false).unwrap();
    /// assert_eq!(
    ///     gathered,
    ///     Value::from(serde_json::json!({"[\"a/b\",\"c\"]": 1, "[\"a\",\"b/c\"]": 2}))
    /// );
    /// ```
    pub fn gather_as(&self, shape: GatherAs, include_paths: bool) -> Result<Value> {
        let gathered = self.gather_paths()?;
        let value = match shape {
            GatherAs::List if include_paths => Value::Array(
                gathered
                    .into_iter()
                    .map(|(path, value)| {
                        let keys = path.keys().into_iter().map(Value::from).collect();
                        Value::Array(vec![Value::Array(keys), value])
                    })
                    .collect(),
            ),
            GatherAs::List => Value::Array(gathered.into_iter().map(|(_, value)| value).collect()),
            GatherAs::Map => {
                let mut map = IndexMap::with_capacity(gathered.len());
                for (path, value) in gathered {
                    map.insert(path_key(&path)?, value);
                }
                Value::Object(map)
            }
        };
        Ok(value)
    }

    /// Applies `f` at every match, in place. A failure part way leaves the
    /// earlier matches updated.
    pub fn map<F>(&mut self, mut f: F) -> Result<&mut Self>
    where
        F: FnMut(Value) -> Value,
    {
        for path in self.paths()? {
            Handle::positioned(self.tree.clone(), path).map(&mut f)?;
        }
        Ok(self)
    }

    /// Sets `value` at every match, in place.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        for path in self.paths()? {
            Handle::positioned(self.tree.clone(), path).set(value.clone())?;
        }
        Ok(self)
    }

    /// Filters a detached gather of the matches.
    ///
    /// The source tree is left alone; the returned handle owns the gathered
    /// structure (see [`MultiHandle::gather_handle`]) with the rejected members
    /// removed.
    pub fn filter<F>(&self, predicate: F, shape: GatherAs, include_paths: bool) -> Result<Handle>
    where
        F: FnMut(Member<'_>) -> bool,
    {
        let mut detached = self.gather_handle(shape, include_paths)?;
        detached.filter(predicate)?;
        Ok(detached)
    }

    /// Folds over a detached gather of the matches.
    pub fn reduce<A, F>(&self, f: F, seed: A, shape: GatherAs, include_paths: bool) -> Result<A>
    where
        F: FnMut(Member<'_>, A) -> A,
    {
        self.gather_handle(shape, include_paths)?.reduce(f, seed)
    }

    /// Sums the gathered values.
    pub fn sum(&self) -> Result<Number> {
        sum_values(&self.gather()?)
    }

    /// A handle on a fresh tree holding [`MultiHandle::gather_as`], positioned
    /// at its root and keeping this path's separator and mode.
    pub fn gather_handle(&self, shape: GatherAs, include_paths: bool) -> Result<Handle> {
        let gathered = self.gather_as(shape, include_paths)?;
        let tree = Tree::new(gathered)?;
        Ok(Handle::positioned(tree, self.path.with_segments(Vec::new())))
    }
}

/// Map key for a gathered path: its keys as a JSON array.
fn path_key(path: &PathExpr) -> Result<String> {
    serde_json::to_string(&path.keys()).map_err(|err| PathError::invalid_argument(err.to_string()))
}
