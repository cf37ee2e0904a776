//! Single-step and whole-path traversal over a [`Value`] tree.
//!
//! Every function matches on the node kind: maps are looked up by key,
//! sequences by integer index, and leaves end the walk with a
//! [`PathError::StructuralMismatch`].

use super::error::{PathError, Result};
use super::expr::Segment;
use crate::document::node::Value;
use tracing::trace;

/// Looks up one key.
///
/// Returns `Ok(None)` when a map does not contain the key. Sequences fail
/// with an index error instead; leaves fail structurally.
pub fn safe_get<'a>(node: &'a Value, key: &str) -> Result<Option<&'a Value>> {
    match node {
        Value::Object(map) => Ok(map.get(key)),
        Value::Array(items) => {
            let index = resolve_index(key, items.len())?;
            Ok(Some(&items[index]))
        }
        leaf => Err(structural(key, leaf)),
    }
}

/// Looks up one key for writing, materializing missing map keys as empty maps.
///
/// Sequences are never grown.
pub fn descend_or_create<'a>(node: &'a mut Value, key: &str) -> Result<&'a mut Value> {
    match node {
        Value::Object(map) => {
            if !map.contains_key(key) {
                trace!(key, "creating intermediate map");
            }
            Ok(map.entry(key.to_string()).or_insert_with(Value::object))
        }
        Value::Array(items) => {
            let index = resolve_index(key, items.len())?;
            Ok(&mut items[index])
        }
        leaf => Err(structural(key, leaf)),
    }
}

/// Keys of a map in insertion order, or the indices of a sequence.
pub fn keys_or_indices(node: &Value, at: &str) -> Result<Vec<String>> {
    match node {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        Value::Array(items) => Ok((0..items.len()).map(|i| i.to_string()).collect()),
        leaf => Err(structural(at, leaf)),
    }
}

/// Walks a whole path with [`safe_get`], stopping at the first absent key.
pub fn resolve<'a>(root: &'a Value, path: &[Segment]) -> Result<Option<&'a Value>> {
    let mut current = root;
    for segment in path {
        match safe_get(current, segment.as_str())? {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Writes `value` at `path`, creating intermediate maps on the way.
///
/// `path` must not be empty; replacing the root is the caller's business.
pub fn assign(root: &mut Value, path: &[Segment], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(PathError::invalid_argument("cannot assign to an empty path"));
    };

    let mut current = root;
    for segment in parents {
        current = descend_or_create(current, segment.as_str())?;
    }

    let key = last.as_str();
    match current {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = resolve_index(key, items.len())?;
            items[index] = value;
            Ok(())
        }
        leaf => Err(structural(key, leaf)),
    }
}

/// Parses a sequence index. Negative indices count from the end.
pub fn resolve_index(key: &str, len: usize) -> Result<usize> {
    let index: i64 = key.trim().parse().map_err(|_| PathError::NotAnIndex {
        segment: key.to_string(),
    })?;

    let normalized = if index < 0 { len as i64 + index } else { index };
    if normalized >= 0 && (normalized as usize) < len {
        Ok(normalized as usize)
    } else {
        Err(PathError::IndexOutOfRange { index, len })
    }
}

fn structural(segment: &str, leaf: &Value) -> PathError {
    PathError::StructuralMismatch {
        segment: segment.to_string(),
        found: leaf.kind(),
    }
}
